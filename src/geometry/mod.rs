pub mod plane_fit;
pub mod vector;

pub use plane_fit::{fit_plane_normal, least_squares_normal};
pub use vector::{average, least_aligned_axis, perpendicular, polar_angle};
