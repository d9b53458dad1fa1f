pub mod mesh;
pub mod renderer;
pub mod shadow;
pub mod texture;
pub mod uniforms;
