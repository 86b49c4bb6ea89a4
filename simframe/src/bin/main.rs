extern crate simframe as sf;
#[macro_use]
extern crate slog;
extern crate slog_async;
extern crate slog_term;

use std::env;
use std::f64::consts::FRAC_PI_2;
use std::fs;
use std::process;

use slog::{Drain, Logger};

use sf::{FrameTreeBuilder, SnapshotState, State, TreeConfig, Vec3};

fn main() {
    let exit_code = {
        let decorator = slog_term::TermDecorator::new().build();
        let drain = slog_term::FullFormat::new(decorator).build().fuse();
        let drain = slog_async::Async::new(drain).build().fuse();
        let root_log = Logger::root(drain, o!("sf_version" => env!("CARGO_PKG_VERSION")));

        match run(&root_log) {
            Ok(()) => 0,
            Err(error) => {
                error!(root_log, "Demo failed"; "error" => format!("{}", error));
                1
            }
        }
        // Dropping the logger here flushes the async drain before we exit.
    };
    process::exit(exit_code);
}

fn load_config(log: &Logger) -> sf::Result<TreeConfig> {
    match env::args().nth(1) {
        None => Ok(TreeConfig::default()),
        Some(path) => {
            info!(log, "Loading tree config"; "path" => &path);
            let json = fs::read_to_string(&path).map_err(|err| {
                sf::FrameError::invalid_config(format!("couldn't read {}: {}", path, err))
            })?;
            TreeConfig::from_json_str(&json)
        }
    }
}

fn run(log: &Logger) -> sf::Result<()> {
    let config = load_config(log)?;

    // Ground, an upper arm turned a quarter turn about Z,
    // and a hand one unit along the arm.
    let mut builder = FrameTreeBuilder::new(log).with_config(config);
    let ground = builder.ground();
    let upper_arm = builder.add_attached_frame(
        "upper_arm",
        ground,
        sf::iso_from_axis_angle(Vec3::z(), FRAC_PI_2),
    )?;
    let hand = builder.add_attached_frame("hand", upper_arm, sf::iso_from_translation(Vec3::x()))?;
    // A free-floating body whose pose the state drives, with a sensor on it.
    let torso = builder.add_grounded_frame("torso")?;
    let imu = builder.add_attached_frame(
        "imu",
        torso,
        sf::iso_from_translation(Vec3::new(0.0, 0.0, 0.3)),
    )?;
    let tree = builder.freeze()?;

    let mut state = SnapshotState::new(&tree);
    let torso = tree.frame(torso)?;
    if let Some(body) = torso.body() {
        state.set_body_pose(
            body,
            sf::Iso3::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 0.0, -FRAC_PI_2)),
        )?;
    }

    let ground = tree.ground_frame();
    let hand = tree.frame(hand)?;
    let imu = tree.frame(imu)?;

    let point = hand.find_location_in_another_frame(&state, &Vec3::x(), ground)?;
    info!(log, "Point on hand in ground"; "point" => format!("{:?}", point.as_slice()));

    let direction = hand.express_vector_in_another_frame(&state, &Vec3::x(), ground)?;
    info!(log, "Hand x-axis in ground"; "direction" => format!("{:?}", direction.as_slice()));

    let x_imu_hand = hand.find_transform_between(&state, imu)?;
    info!(log, "Hand relative to IMU";
        "translation" => format!("{:?}", x_imu_hand.translation.vector.as_slice()),
        "rotation" => format!("{:?}", x_imu_hand.rotation.euler_angles()));

    for frame in tree.frames() {
        info!(log, "Frame";
            "name" => frame.name(),
            "base" => frame.find_base_frame().name(),
            "depth" => frame.depth());
    }

    let cache = state.transform_cache();
    info!(log, "Transform cache"; "entries" => cache.len(), "hits" => cache.hits(), "misses" => cache.misses());
    Ok(())
}
