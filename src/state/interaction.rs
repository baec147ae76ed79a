/// The closed set of interaction modes the editor can be in.
///
/// Exactly one mode is current at a time. Moving between modes goes through
/// [`super::StateMachine`], which checks [`InteractionState::can_transition_to`].
///
/// # State Transitions
///
/// ```text
///                 ┌──────────────────────────┐
///                 │ Drawing, Panning,        │
///        ┌────────► Rotating, DrawingSelBox, ├───────┐
///        │        │ Dragging*, CurveControl  │       │
///        │        └──────────────────────────┘       │
///        │                                           │
///   ┌────┴───┐    ┌────────────────┐                 │   ┌────────┐
///   │        ├────► DraggingObject ├─────────────────┼───►        │
///   │  Idle  │    └────────────────┘                 │   │  Idle  │
///   │        │    ┌───────────────────┐              │   │        │
///   │        ├────► DraggingSelection ├──────────────┤   └────────┘
///   │        │    └───────────────────┘              │
///   │        │    ┌──────────────────────┐           │
///   │        ├────► PlacingConnectorSrc  ├──┐        │
///   │        │    └──────────────────────┘  │        │
///   │        │    ┌─────────────────────────▼┐       │
///   │        ├────► PlacingConnectorTarget   ├───────┘
///   └────────┘    └──────────────────────────┘
/// ```
///
/// Every state may return to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InteractionState {
    /// No interaction in progress
    #[default]
    Idle,
    /// A creation tool is drawing a new object
    Drawing,
    /// The view is being dragged
    Panning,
    /// The rotation handle of a selected object is being dragged
    Rotating,
    /// Several selected objects are being moved together
    DraggingSelection,
    /// A single object is being moved
    DraggingObject,
    /// One end of a selected connector is being dragged
    DraggingConnectorEndpoint,
    /// The connector tool is waiting for a source click
    PlacingConnectorSource,
    /// The connector tool has a source and waits for a target click
    PlacingConnectorTarget,
    /// A rubber-band selection box is being drawn
    DrawingSelectionBox,
    /// The curve handle of a selected connector is being dragged
    DraggingCurveControlPoint,
}

impl InteractionState {
    pub const ALL: [InteractionState; 11] = [
        InteractionState::Idle,
        InteractionState::Drawing,
        InteractionState::Panning,
        InteractionState::Rotating,
        InteractionState::DraggingSelection,
        InteractionState::DraggingObject,
        InteractionState::DraggingConnectorEndpoint,
        InteractionState::PlacingConnectorSource,
        InteractionState::PlacingConnectorTarget,
        InteractionState::DrawingSelectionBox,
        InteractionState::DraggingCurveControlPoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionState::Idle => "Idle",
            InteractionState::Drawing => "Drawing",
            InteractionState::Panning => "Panning",
            InteractionState::Rotating => "Rotating",
            InteractionState::DraggingSelection => "DraggingSelection",
            InteractionState::DraggingObject => "DraggingObject",
            InteractionState::DraggingConnectorEndpoint => "DraggingConnectorEndpoint",
            InteractionState::PlacingConnectorSource => "PlacingConnectorSource",
            InteractionState::PlacingConnectorTarget => "PlacingConnectorTarget",
            InteractionState::DrawingSelectionBox => "DrawingSelectionBox",
            InteractionState::DraggingCurveControlPoint => "DraggingCurveControlPoint",
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == InteractionState::Idle
    }

    /// Successors allowed from this state, not counting `Idle`
    pub fn allowed_successors(&self) -> &'static [InteractionState] {
        use InteractionState::*;
        match self {
            Idle => &[
                Drawing,
                Panning,
                Rotating,
                DraggingSelection,
                DraggingObject,
                DraggingConnectorEndpoint,
                PlacingConnectorSource,
                PlacingConnectorTarget,
                DrawingSelectionBox,
                DraggingCurveControlPoint,
            ],
            PlacingConnectorSource => &[PlacingConnectorTarget],
            _ => &[],
        }
    }

    /// Validates whether a transition to `next` is allowed
    pub fn can_transition_to(&self, next: InteractionState) -> bool {
        next == InteractionState::Idle || self.allowed_successors().contains(&next)
    }
}

impl std::fmt::Display for InteractionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_reachable_from_everywhere() {
        for state in InteractionState::ALL {
            assert!(state.can_transition_to(InteractionState::Idle), "{state}");
        }
    }

    #[test]
    fn drawing_cannot_jump_to_panning() {
        assert!(!InteractionState::Drawing.can_transition_to(InteractionState::Panning));
        assert!(InteractionState::Idle.can_transition_to(InteractionState::Panning));
    }

    #[test]
    fn connector_placement_progresses_source_to_target() {
        assert!(
            InteractionState::PlacingConnectorSource
                .can_transition_to(InteractionState::PlacingConnectorTarget)
        );
        assert!(
            !InteractionState::PlacingConnectorTarget
                .can_transition_to(InteractionState::PlacingConnectorSource)
        );
    }
}
