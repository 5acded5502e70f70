//! Zoom renderer CLI - Render escape-time volumes from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use mandel_zoom::{
    compute::{EscapeStats, Renderer},
    schema::RenderConfig,
    volume::{ByteOrder, read_volume, write_volume},
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [output.dat] [little|big]", args[0]);
        eprintln!("       {} --info <volume.dat> [little|big]", args[0]);
        eprintln!();
        eprintln!("Render a Mandelbrot zoom sequence into a binary escape-time volume.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to render configuration file");
        eprintln!("  output.dat   Destination volume file (default: escape.dat)");
        eprintln!("  little|big   On-disk byte order (default: big)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    if args[1] == "--info" {
        let Some(path) = args.get(2) else {
            eprintln!("Usage: {} --info <volume.dat> [little|big]", args[0]);
            std::process::exit(1);
        };
        print_volume_info(path, parse_order(args.get(3)));
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("escape.dat"));
    let order = parse_order(args.get(3));

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: RenderConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let renderer = Renderer::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });
    let config = renderer.config();

    println!("Mandelbrot Zoom Render");
    println!("======================");
    println!(
        "Grid: {}x{} ({} frames)",
        config.width, config.height, config.frames
    );
    println!("Center: {} {:+}i", config.center.re, config.center.im);
    println!(
        "Half-width: {} (scale {} per frame)",
        config.half_width, config.scale
    );
    println!("Workers: {}", config.workers);
    println!();

    // Render
    println!("Rendering...");
    let start = Instant::now();
    let volume = renderer.render().unwrap_or_else(|e| {
        eprintln!("Render failed: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    let stats = EscapeStats::from_values(&volume.values);
    println!();
    println!("Rendered volume:");
    println!("  Bounded points: {}", stats.bounded);
    println!("  Escaped points: {}", stats.escaped);
    println!(
        "  Escape range: [{:.6}, {:.6}] (mean {:.6})",
        stats.min_escape, stats.max_escape, stats.mean_escape
    );
    println!(
        "Time: {:.2}s ({:.2} Mpixel/s)",
        elapsed.as_secs_f64(),
        volume.values.len() as f64 / elapsed.as_secs_f64() / 1e6
    );
    println!();

    // Store
    if let Err(e) = write_volume(&output_path, &volume, order) {
        eprintln!("Error writing volume: {}", e);
        std::process::exit(1);
    }
    println!(
        "Wrote {} ({} values, {:?})",
        output_path.display(),
        volume.values.len(),
        order
    );
}

fn parse_order(arg: Option<&String>) -> ByteOrder {
    match arg.map(String::as_str) {
        None | Some("big") => ByteOrder::BigEndian,
        Some("little") => ByteOrder::LittleEndian,
        Some(other) => {
            eprintln!("Unknown byte order '{}'; expected 'little' or 'big'", other);
            std::process::exit(1);
        }
    }
}

fn print_volume_info(path: &str, order: ByteOrder) {
    let volume = read_volume(path, order).unwrap_or_else(|e| {
        eprintln!("Error reading volume: {}", e);
        std::process::exit(1);
    });
    let stats = EscapeStats::from_values(&volume.values);

    println!("{}", path);
    println!(
        "  Grid: {}x{} ({} frames)",
        volume.width, volume.height, volume.frames
    );
    println!("  Values: {}", volume.values.len());
    println!("  Bounded points: {}", stats.bounded);
    println!("  Escaped points: {}", stats.escaped);
    println!(
        "  Escape range: [{:.6}, {:.6}] (mean {:.6})",
        stats.min_escape, stats.max_escape, stats.mean_escape
    );
}

fn print_example_config() {
    let config = RenderConfig::default();

    println!("Example configuration (config.json):");
    println!("{}", serde_json::to_string_pretty(&config).unwrap());
}
