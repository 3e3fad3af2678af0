pub mod ascii;
pub mod model;
pub mod ribbon;

/// Full-screen triangle vertices.
pub const FS_TRI: [[f32; 2]; 3] = [[-1.0, -1.0], [3.0, -1.0], [-1.0, 3.0]];
