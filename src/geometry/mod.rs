pub mod attachment;
pub mod handles;
pub mod hit_testing;

pub use attachment::{attachment_point, bind_end, resolve_binding};
pub use handles::{Handle, handle_at, is_on_rotation_handle, rotation_handle_position, screen_radius_to_world};
pub use hit_testing::{
    HitMode, HitTestOptions, bbox_hit, combined_bounds, hit_test, hits_at, objects_in_rect,
    precision_hit, topmost_at,
};
