use {
    base::Vec2,
    image::{Image, image_to_u32},
    minifb::{Key, Window, WindowOptions},
};

const DOT_RADIUS: i32 = 3;
const DOT_COLOR: u32 = 0x00ff0000;

/// Window showing the color frame with the selected joints as dots.
pub struct Preview {
    window: Window,
}

impl Preview {
    pub fn open(size: Vec2<usize>) -> Result<Self, minifb::Error> {
        let window = Window::new("posecast - ESC to exit", size.x, size.y, WindowOptions::default())?;
        Ok(Self { window })
    }

    /// False once the window was closed or ESC pressed.
    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    pub fn show(&mut self, image: &Image, points: &[Vec2<f32>]) -> Result<(), minifb::Error> {
        let mut buffer = image_to_u32(image);
        for point in points {
            draw_dot(&mut buffer, image.size, *point);
        }
        self.window.update_with_buffer(&buffer, image.size.x, image.size.y)
    }
}

fn draw_dot(buffer: &mut [u32], size: Vec2<usize>, center: Vec2<f32>) {
    let (cx, cy) = (center.x as i32, center.y as i32);
    for dy in -DOT_RADIUS..=DOT_RADIUS {
        for dx in -DOT_RADIUS..=DOT_RADIUS {
            if dx * dx + dy * dy > DOT_RADIUS * DOT_RADIUS {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x < 0 || y < 0 || x >= size.x as i32 || y >= size.y as i32 {
                continue;
            }
            if let Some(pixel) = buffer.get_mut(y as usize * size.x + x as usize) {
                *pixel = DOT_COLOR;
            }
        }
    }
}
