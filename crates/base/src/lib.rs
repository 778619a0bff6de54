pub mod log;
pub use self::log::*;

mod mat4;
pub use mat4::*;

mod rect;
pub use rect::*;

mod tensor;
pub use tensor::*;

mod vec2;
pub use vec2::*;

mod vec3;
pub use vec3::*;

mod vec4;
pub use vec4::*;
