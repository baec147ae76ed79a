use crate::DiagramApp;

pub fn central_panel(app: &mut DiagramApp, ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none())
        .show(ctx, |ui| {
            let available_size = ui.available_size();
            let (response, painter) = ui.allocate_painter(available_size, egui::Sense::click_and_drag());
            let canvas_rect = response.rect;

            // Handle input
            app.handle_input(ctx, &response);

            // Render the canvas
            app.renderer().render(&painter, canvas_rect, app.controller());
            if response.hovered() {
                ctx.set_cursor_icon(app.controller().cursor());
            }
        });
}
