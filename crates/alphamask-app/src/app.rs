use std::time::Instant;

use alphamask_core::image::Image;
use alphamask_core::render::{count_mismatches, render, MaskStats};
use alphamask_core::sampler::SampledImage;
use alphamask_gpu::{GpuContext, GpuError, MaskPass};

use crate::config::Args;

/// What one invocation produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub cpu: MaskStats,
    /// `None` when the GPU pass was skipped or unavailable.
    pub gpu: Option<MaskStats>,
    pub mismatches: usize,
}

impl Outcome {
    pub fn agrees(&self) -> bool {
        self.mismatches == 0
    }
}

pub fn run(args: &Args) -> Result<Outcome, Box<dyn std::error::Error>> {
    let source = args.build_pattern()?;
    let sampler = args.sampler();
    log::info!(
        "{:?} pattern, {}x{} target, {:?}",
        args.pattern,
        args.width,
        args.height,
        sampler
    );

    let started = Instant::now();
    let cpu_out = render(&SampledImage::new(&source, sampler), args.width, args.height)?;
    let cpu = MaskStats::from_image(&cpu_out);
    log_stats("cpu", &cpu, started);

    if args.cpu_only {
        return Ok(Outcome { cpu, gpu: None, mismatches: 0 });
    }

    let ctx = match GpuContext::new_headless_blocking() {
        Ok(ctx) => ctx,
        Err(e) => {
            log::warn!("GPU unavailable, keeping CPU result: {e}");
            return Ok(Outcome { cpu, gpu: None, mismatches: 0 });
        }
    };

    let started = Instant::now();
    let gpu_out = run_gpu(&ctx, &source, args)?;
    let gpu = MaskStats::from_image(&gpu_out);
    log_stats("gpu", &gpu, started);

    let mismatches = count_mismatches(&cpu_out, &gpu_out);
    if mismatches > 0 {
        log::warn!("{mismatches} pixels differ between CPU and GPU");
    } else {
        log::info!("CPU and GPU masks agree");
    }

    Ok(Outcome { cpu, gpu: Some(gpu), mismatches })
}

fn run_gpu(ctx: &GpuContext, source: &Image, args: &Args) -> Result<Image, GpuError> {
    let pass = MaskPass::new(&ctx.device);
    pass.run(ctx, source, args.sampler(), args.width, args.height)
}

fn log_stats(path: &str, stats: &MaskStats, started: Instant) {
    log::info!(
        "{path}: {} red, {} blue ({:.1}% covered) in {:.2} ms",
        stats.covered,
        stats.empty,
        stats.coverage_ratio() * 100.0,
        started.elapsed().as_secs_f64() * 1000.0
    );
    if stats.other > 0 {
        log::warn!("{path}: {} pixels are neither red nor blue", stats.other);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("alphamask").chain(extra.iter().copied())).unwrap()
    }

    #[test]
    fn cpu_only_run_covers_the_disc() {
        let outcome = run(&args(&["--width", "40", "--height", "40", "--radius", "10", "--cpu-only"]))
            .unwrap();
        assert!(outcome.gpu.is_none());
        assert!(outcome.agrees());
        assert_eq!(outcome.cpu.total(), 1600);
        assert_eq!(outcome.cpu.other, 0);
        // pi * 10^2 ~ 314 texels
        assert!((280..=340).contains(&outcome.cpu.covered), "{:?}", outcome.cpu);
    }

    #[test]
    fn checkerboard_is_half_covered() {
        let outcome = run(&args(&[
            "--width", "32", "--height", "32", "--pattern", "checkerboard", "--cell", "4", "--cpu-only",
        ]))
        .unwrap();
        assert_eq!(outcome.cpu.covered, 512);
        assert_eq!(outcome.cpu.empty, 512);
    }

    #[test]
    fn invalid_size_is_an_error() {
        assert!(run(&args(&["--width", "0", "--cpu-only"])).is_err());
    }

    #[test]
    fn gpu_run_agrees_or_falls_back() {
        let outcome = run(&args(&["--width", "48", "--height", "32"])).unwrap();
        assert!(outcome.agrees());
        if let Some(gpu) = outcome.gpu {
            assert_eq!(gpu, outcome.cpu);
        }
    }
}
