use minifb::{Key, Window, WindowOptions};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::biome::{self, ColorField};
use crate::export;
use crate::heightfield::{self, HeightFieldParams};

/// Which of the two generated textures is on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ViewMode {
    Height,
    Color,
}

impl ViewMode {
    fn label(&self) -> &'static str {
        match self {
            ViewMode::Height => "Height (grayscale)",
            ViewMode::Color => "Biome colors",
        }
    }

    fn toggled(&self) -> Self {
        match self {
            ViewMode::Height => ViewMode::Color,
            ViewMode::Color => ViewMode::Height,
        }
    }
}

/// The generated texture pair for one seed.
struct TexturePair {
    height: ColorField,
    color: ColorField,
}

/// Run the interactive viewer.
/// `T` toggles height/color view, `R` regenerates with a fresh seed,
/// `S` saves both textures, `Esc` exits.
pub fn run_viewer(
    params: &HeightFieldParams,
    width: usize,
    height: usize,
    initial_seed: Option<u64>,
    height_path: &str,
    color_path: &str,
) {
    let mut window = Window::new(
        &format!("Terrain Maps {width} by {height} - T: toggle, R: regenerate, S: save"),
        width,
        height,
        WindowOptions::default(),
    )
    .expect("Failed to create window");

    window.set_target_fps(60);

    let mut seed = initial_seed.unwrap_or_else(rand::random);
    let mut textures = generate_textures(params, width, height, seed);
    let mut view_mode = ViewMode::Color;
    let mut buffer = render_view(&textures, view_mode);

    println!("Viewer started. Controls:");
    println!("  T: Toggle height/color texture");
    println!("  R: Regenerate with a new seed");
    println!("  S: Save both textures");
    println!("  Esc: Exit");

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let mut needs_redraw = false;

        if window.is_key_pressed(Key::T, minifb::KeyRepeat::No) {
            view_mode = view_mode.toggled();
            println!("View: {}", view_mode.label());
            needs_redraw = true;
        }

        if window.is_key_pressed(Key::R, minifb::KeyRepeat::No) {
            seed = rand::random();
            println!("Regenerating with seed: {}", seed);
            textures = generate_textures(params, width, height, seed);
            needs_redraw = true;
        }

        if window.is_key_pressed(Key::S, minifb::KeyRepeat::No) {
            save_textures(&textures, height_path, color_path);
        }

        if needs_redraw {
            buffer = render_view(&textures, view_mode);
        }

        window
            .update_with_buffer(&buffer, width, height)
            .expect("Failed to update window");
    }
}

/// Generate a fresh texture pair. One RNG is shared by the fractal
/// subdivision and the color jitter, so a seed pins both textures.
fn generate_textures(
    params: &HeightFieldParams,
    width: usize,
    height: usize,
    seed: u64,
) -> TexturePair {
    println!("Generating terrain with seed: {}...", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Params are validated before the window opens, so generation can
    // only fail on a degenerate flat field.
    let field = match heightfield::generate(params, &mut rng) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            let blank = ColorField::new_with(width, height, [0u8; 3]);
            return TexturePair {
                height: blank.clone(),
                color: blank,
            };
        }
    };

    let pair = TexturePair {
        height: export::grayscale_field(&field, width, height),
        color: biome::classify(&field, width, height, &mut rng),
    };
    println!("Done! Grid size: {0}x{0}", field.size());
    pair
}

fn save_textures(textures: &TexturePair, height_path: &str, color_path: &str) {
    match export::export_color_field(&textures.height, height_path) {
        Ok(()) => println!("Saved {}", height_path),
        Err(e) => eprintln!("Failed to save {}: {}", height_path, e),
    }
    match export::export_color_field(&textures.color, color_path) {
        Ok(()) => println!("Saved {}", color_path),
        Err(e) => eprintln!("Failed to save {}: {}", color_path, e),
    }
}

/// Pack the selected texture into minifb's 0RGB u32 buffer.
fn render_view(textures: &TexturePair, mode: ViewMode) -> Vec<u32> {
    let colors = match mode {
        ViewMode::Height => &textures.height,
        ViewMode::Color => &textures.color,
    };
    colors
        .values()
        .iter()
        .map(|[r, g, b]| ((*r as u32) << 16) | ((*g as u32) << 8) | *b as u32)
        .collect()
}
