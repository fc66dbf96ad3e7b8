use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use terrain_map::heightfield::{self, HeightFieldParams};
use terrain_map::{biome, export, viewer};

#[derive(Parser, Debug)]
#[command(name = "terrain_map")]
#[command(about = "Generate fractal terrain height and color textures")]
struct Args {
    /// Width of the output textures in pixels
    #[arg(short = 'W', long, default_value = "512")]
    width: usize,

    /// Height of the output textures in pixels
    #[arg(short = 'H', long, default_value = "512")]
    height: usize,

    /// Grid exponent; the working grid is 2^edge_size + 1 on a side
    #[arg(short, long, default_value = "9")]
    edge_size: u32,

    /// Displacement damping in (0, 1]; higher is rougher terrain
    #[arg(short, long, default_value = "0.7")]
    roughness: f32,

    /// Random seed (uses a random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output path for the grayscale height texture
    #[arg(long, default_value = "height_texture.png")]
    height_out: String,

    /// Output path for the biome color texture
    #[arg(long, default_value = "color_texture.png")]
    color_out: String,

    /// Open an interactive window instead of writing files
    #[arg(short, long)]
    view: bool,
}

fn main() {
    let args = Args::parse();

    let params = HeightFieldParams {
        edge_size: args.edge_size,
        roughness: args.roughness,
    };

    if let Err(e) = heightfield::validate(&params) {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    if args.view {
        viewer::run_viewer(
            &params,
            args.width,
            args.height,
            args.seed,
            &args.height_out,
            &args.color_out,
        );
        return;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    println!("Generating terrain with seed: {}", seed);
    println!("Texture size: {}x{}", args.width, args.height);

    let field = match heightfield::generate(&params, &mut rng) {
        Ok(field) => field,
        Err(e) => {
            eprintln!("Generation failed: {}", e);
            std::process::exit(1);
        }
    };
    println!(
        "Generated {0}x{0} height grid (edge size {1})",
        field.size(),
        field.edge_size()
    );

    let height_texture = export::grayscale_field(&field, args.width, args.height);
    let color_texture = biome::classify(&field, args.width, args.height, &mut rng);

    if let Err(e) = export::export_color_field(&height_texture, &args.height_out) {
        eprintln!("Failed to save {}: {}", args.height_out, e);
        std::process::exit(1);
    }
    println!("Saved {}", args.height_out);

    if let Err(e) = export::export_color_field(&color_texture, &args.color_out) {
        eprintln!("Failed to save {}: {}", args.color_out, e);
        std::process::exit(1);
    }
    println!("Saved {}", args.color_out);
}
