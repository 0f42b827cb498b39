use sdl2::keyboard::Keycode;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Instant;
use stormgrid::config::DEFAULT_CONFIG_PATH;
use stormgrid::display::{Display, InputEvent, MouseButtonKind, PixelBuffer, RenderTarget};
use stormgrid::storm::{Material, Parameter};
use stormgrid::util::FpsCounter;
use stormgrid::{ConfigError, Storm, StormConfig, StormView};
use tracing::{info, warn};

const DISCHARGE_STEP: f32 = 1.0;
const RANDOMNESS_STEP: f32 = 10.0;
const BURN_STEP: f32 = 10.0;

struct Args {
    config: PathBuf,
    cell_size: Option<u32>,
    seed: Option<u64>,
    vsync: bool,
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        config: PathBuf::from(DEFAULT_CONFIG_PATH),
        cell_size: None,
        seed: None,
        vsync: true,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => parsed.vsync = false,
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = PathBuf::from(&args[i + 1]);
                    i += 1;
                }
            },
            "--cell-size" => {
                if i + 1 < args.len() {
                    parsed.cell_size = args[i + 1].parse::<u32>().ok().filter(|&s| s > 0);
                    i += 1;
                }
            },
            "--seed" => {
                if i + 1 < args.len() {
                    parsed.seed = args[i + 1].parse::<u64>().ok();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: stormgrid [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --config PATH, -c PATH  Settings file (default: {})",
                    DEFAULT_CONFIG_PATH
                );
                println!("  --cell-size N           Pixels per grid cell");
                println!("  --seed N                Fixed random seed");
                println!("  --no-vsync              Disable VSync for uncapped framerate");
                println!("  --help                  Show this help message");
                println!();
                println!("Controls:");
                println!("  Left drag   - Paint selected material");
                println!("  1-6         - Air, conductor, insulator, ground, cloud, semiconductor");
                println!("  Space       - Strike");
                println!("  M           - Multi strike");
                println!("  A           - Toggle auto strike");
                println!("  P           - Pause");
                println!("  C           - Clear grid");
                println!("  R           - Reset simulation");
                println!("  D           - Demo layout");
                println!("  Up/Down     - Discharge strength");
                println!("  Right/Left  - Arc randomness");
                println!("  ] / [       - Burn trail duration");
                println!("  F           - Toggle FPS logging");
                println!("  S           - Save settings");
                println!("  Escape      - Quit");
                std::process::exit(0);
            },
            other => warn!(arg = other, "ignoring unknown argument"),
        }
        i += 1;
    }

    parsed
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn load_config(args: &Args) -> StormConfig {
    let mut config = match StormConfig::load(&args.config) {
        Ok(config) => {
            info!(path = %args.config.display(), "settings loaded");
            config
        },
        Err(ConfigError::Io(e)) if e.kind() == ErrorKind::NotFound => StormConfig::default(),
        Err(e) => {
            warn!(path = %args.config.display(), error = %e, "falling back to default settings");
            StormConfig::default()
        },
    };
    if let Some(size) = args.cell_size {
        config.cell_size = size;
    }
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }
    if let Err(e) = config.validate() {
        warn!(error = %e, "falling back to default settings");
        return StormConfig::default();
    }
    config
}

fn window_title(storm: &Storm, material: Material) -> String {
    let stats = storm.stats();
    let params = storm.params();
    let mut title = format!(
        "stormgrid | {} | strikes {} | last {} cells, {} branches | V{:.0} R{:.0}% B{}",
        material.properties().name,
        stats.total_strikes,
        stats.last_strike_length,
        stats.last_branches,
        params.discharge_strength,
        params.arc_randomness,
        params.burn_trail_duration,
    );
    if storm.is_paused() {
        title.push_str(" | PAUSED");
    }
    if storm.is_auto_striking() {
        title.push_str(" | AUTO");
    }
    title
}

fn main() -> Result<(), String> {
    init_tracing();
    let args = parse_args();
    let mut config = load_config(&args);

    let (width, height) = config.window_size();
    let (mut display, texture_creator) = Display::with_options("stormgrid", width, height, args.vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    let mut storm = Storm::from_config(&config);
    let view = StormView::new(config.cell_size);
    let mut material = Material::Conductor;
    let mut painting = false;

    let mut fps_counter = FpsCounter::new(60);
    let mut log_fps = false;
    let mut last_fps_log = Instant::now();
    let started = Instant::now();
    let mut title = String::new();

    info!(width, height, seed = storm.seed(), "stormgrid running, --help lists the controls");

    'main: loop {
        let (dt, avg_fps) = fps_counter.tick();

        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(key) => match key {
                    Keycode::Escape => break 'main,
                    Keycode::Space => storm.trigger_strike(),
                    Keycode::M => storm.multi_strike(),
                    Keycode::C => storm.clear_grid(),
                    Keycode::R => storm.reset_simulation(),
                    Keycode::P => {
                        storm.toggle_pause();
                    },
                    Keycode::A => {
                        let on = storm.toggle_auto_strike();
                        info!(on, "auto strike toggled");
                    },
                    Keycode::D => storm.setup_demo(),
                    Keycode::Num1 => material = Material::ALL[0],
                    Keycode::Num2 => material = Material::ALL[1],
                    Keycode::Num3 => material = Material::ALL[2],
                    Keycode::Num4 => material = Material::ALL[3],
                    Keycode::Num5 => material = Material::ALL[4],
                    Keycode::Num6 => material = Material::ALL[5],
                    Keycode::Up => {
                        storm.adjust_parameter(Parameter::DischargeStrength, DISCHARGE_STEP);
                    },
                    Keycode::Down => {
                        storm.adjust_parameter(Parameter::DischargeStrength, -DISCHARGE_STEP);
                    },
                    Keycode::Right => {
                        storm.adjust_parameter(Parameter::ArcRandomness, RANDOMNESS_STEP);
                    },
                    Keycode::Left => {
                        storm.adjust_parameter(Parameter::ArcRandomness, -RANDOMNESS_STEP);
                    },
                    Keycode::RightBracket => {
                        storm.adjust_parameter(Parameter::BurnTrailDuration, BURN_STEP);
                    },
                    Keycode::LeftBracket => {
                        storm.adjust_parameter(Parameter::BurnTrailDuration, -BURN_STEP);
                    },
                    Keycode::F => log_fps = !log_fps,
                    Keycode::S => {
                        config.params = *storm.params();
                        match config.save(&args.config) {
                            Ok(()) => info!(path = %args.config.display(), "settings saved"),
                            Err(e) => warn!(error = %e, "failed to save settings"),
                        }
                    },
                    _ => {},
                },
                InputEvent::MouseDown {
                    x,
                    y,
                    button: MouseButtonKind::Left,
                } => {
                    painting = true;
                    let (cx, cy) = view.brush_at(x, y);
                    storm.paint(cx, cy, material);
                },
                InputEvent::MouseMove { x, y } if painting => {
                    let (cx, cy) = view.brush_at(x, y);
                    storm.paint(cx, cy, material);
                },
                InputEvent::MouseUp {
                    button: MouseButtonKind::Left,
                    ..
                } => painting = false,
                _ => {},
            }
        }

        storm.advance(dt);
        view.render(&storm, &mut buffer, started.elapsed().as_secs_f32());

        if log_fps && last_fps_log.elapsed().as_secs_f32() >= 1.0 {
            info!(
                fps = avg_fps as u32,
                frame_ms = fps_counter.avg_frame_time_ms(),
                arcs = storm.arcs().len(),
                "frame timing"
            );
            last_fps_log = Instant::now();
        }

        let next_title = window_title(&storm, material);
        if next_title != title {
            display.set_title(&next_title);
            title = next_title;
        }

        display.present(&mut target, &buffer)?;
    }

    Ok(())
}
