use crate::DiagramApp;

pub fn tools_panel(app: &mut DiagramApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(180.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool_name = app.controller().current_tool();
            let tool_names = app.controller().tools().tool_names();

            for tool_name in tool_names {
                let is_selected = active_tool_name == tool_name;
                if ui.selectable_label(is_selected, tool_name).clicked() {
                    log::info!("Tool selected from UI: {}", tool_name);
                    app.controller_mut().select_tool(tool_name);
                }
            }
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let controller = app.controller();
                let can_undo = controller.can_undo();
                let can_redo = controller.can_redo();
                let undo_hover = controller.undo_label().unwrap_or_default();
                let redo_hover = controller.redo_label().unwrap_or_default();

                if ui
                    .add_enabled(can_undo, egui::Button::new("Undo"))
                    .on_hover_text(undo_hover)
                    .clicked()
                {
                    app.controller_mut().undo();
                }
                if ui
                    .add_enabled(can_redo, egui::Button::new("Redo"))
                    .on_hover_text(redo_hover)
                    .clicked()
                {
                    app.controller_mut().redo();
                }
            });

            let has_selection = !app.controller().selection().is_empty();
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete selection"))
                .clicked()
            {
                app.controller_mut().delete_selection();
            }

            ui.separator();

            let controller = app.controller();
            let history = controller.history();
            ui.label(format!("Undo stack size: {}", history.undo_len()));
            ui.label(format!("Redo stack size: {}", history.redo_len()));
            ui.label(format!("Objects: {}", controller.document().len()));
            ui.label(format!("Selected: {}", controller.selection().len()));
            ui.label(format!("State: {}", controller.state()));
            ui.label(format!("Zoom: {:.0}%", controller.viewport().zoom * 100.0));
        });
}
