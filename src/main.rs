use anyhow::Context;
use fiberpos::{
    build_model, init_logging, Config, FiberMosModel, Instruction, InstructionName, MotionTarget,
    Point, RpIndex, BUILD_DATE, VERSION,
};
use fiberpos_core::geometry::normalize_angle;
use std::path::PathBuf;
use tracing::{info, warn};

fn load_config() -> anyhow::Result<Config> {
    let path = match std::env::args().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => match Config::default_path().filter(|p| p.exists()) {
            Some(path) => path,
            None => {
                info!("no configuration file, using defaults");
                return Ok(Config::default());
            }
        },
    };
    let config = Config::load_from_file(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    info!(path = %path.display(), "configuration loaded");
    Ok(config)
}

fn report(model: &mut FiberMosModel, pose: &str) -> anyhow::Result<()> {
    let pairs = model.search_colliding()?;
    let stats = model.last_sweep_stats();
    info!(
        pose,
        colliding = pairs.len(),
        ea_rp_tests = stats.ea_rp_tests,
        rp_rp_tests = stats.rp_rp_tests,
        "collision report"
    );
    Ok(())
}

/// Stretches every arm away from the array center.
fn outward(model: &mut FiberMosModel) -> anyhow::Result<()> {
    let indices: Vec<RpIndex> = model.positioners().map(|(i, _)| i).collect();
    for i in indices {
        let Some(rp) = model.positioner_mut(i) else {
            continue;
        };
        let cylinder = rp.cylinder();
        let direction = cylinder.p0().angle();
        let theta_1 = normalize_angle(direction - cylinder.theta_o1());
        let theta_2 = cylinder.arm().theta_2_of_beta(0.0);
        rp.execute(&Instruction::new(InstructionName::MA, &[theta_1, theta_2])?)?;
    }
    Ok(())
}

/// Target stretching the arm of `index` towards the anchor of `other`.
fn facing(model: &FiberMosModel, index: RpIndex, other: RpIndex) -> Option<MotionTarget> {
    let cylinder = model.positioner(index)?.cylinder();
    let toward = model.positioner(other)?.cylinder().p0();
    Some(MotionTarget {
        index,
        theta_1: normalize_angle((toward - cylinder.p0()).angle() - cylinder.theta_o1()),
        theta_2: cylinder.arm().theta_2_of_beta(0.0),
    })
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    info!(version = VERSION, build_date = BUILD_DATE, "fiberpos");

    let config = load_config()?;
    let mut model = build_model(&config)?;
    report(&mut model, "parked")?;

    let parked = model.clone();
    outward(&mut model)?;
    report(&mut model, "outward")?;

    // head-on motion of the central positioner and its first neighbour
    let mut model = parked;
    let center = model.positioners().find(|(_, rp)| rp.cylinder().p0() == Point::origin());
    let Some((a, rp)) = center else {
        warn!("no central positioner");
        return Ok(());
    };
    let Some(b) = rp.adjacent_rps().first().map(|adjacent| adjacent.index) else {
        warn!("central positioner has no neighbours");
        return Ok(());
    };
    let targets: Vec<MotionTarget> = [(a, b), (b, a)]
        .into_iter()
        .filter_map(|(index, other)| facing(&model, index, other))
        .collect();
    let motion = model.check_motion(&targets, 50)?;
    info!(
        samples = motion.samples,
        collisions = motion.collisions.len(),
        contour_tests = motion.contour_tests,
        "head-on motion checked"
    );
    for collision in &motion.collisions {
        info!(sample = collision.sample, pair = ?collision.pair, "first contact");
    }
    Ok(())
}
