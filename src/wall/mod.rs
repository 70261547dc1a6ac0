//! Wall domain: wall slide, wall jump and dash.

mod dash;
mod slide;
mod system;
#[cfg(test)]
mod tests;
mod wall_jump;

pub use dash::{DashDirection, DashDrive, DashLaunch, DashState, DashSystem};
pub use slide::{SlideConstraint, SlideEdge, grip_after};
pub use system::WallInteractionSystem;
pub use wall_jump::{DirectionLock, WallCoyote, WallJumpLaunch, wall_jump_velocity};
