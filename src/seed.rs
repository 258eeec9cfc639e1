//! Deterministic seeding of the pipeline's random-number streams.
//!
//! Rather than mutating hidden global generators, [`set_seed`] returns a
//! [`SeededRngs`] bundle holding one generator per subsystem. Callers thread
//! the handles they need into shuffling, initialisation and dropout code.
//! Equal seeds and equal device counts always produce equal draw sequences.

use rand::{SeedableRng, rngs::StdRng};
use rand_chacha::ChaCha8Rng;

/// Environment variable listing the CUDA device ordinals visible to the process.
pub const CUDA_VISIBLE_DEVICES: &str = "CUDA_VISIBLE_DEVICES";

/// ChaCha stream id for the numeric-array generator.
const ARRAY_STREAM: u64 = 1;
/// ChaCha stream id for the tensor CPU generator.
const TENSOR_STREAM: u64 = 2;
/// First ChaCha stream id for GPU generators; device `n` uses `GPU_STREAM_BASE + n`.
const GPU_STREAM_BASE: u64 = 16;

/// Configuration exposing the values needed to seed a run.
pub trait SeedSource {
    fn seed(&self) -> u64;

    /// Whether GPU generators must be left unseeded.
    fn no_cuda(&self) -> bool;
}

/// Reports how many CUDA devices are usable.
pub trait DeviceProbe {
    fn cuda_device_count(&self) -> usize;
}

/// Probe that never reports a device.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuOnly;

impl DeviceProbe for CpuOnly {
    fn cuda_device_count(&self) -> usize {
        0
    }
}

/// Probe that counts the devices listed in `CUDA_VISIBLE_DEVICES`.
///
/// Entries are ordinals or `GPU-`/`MIG-` UUIDs. An unset or blank variable
/// means no devices. As with the CUDA runtime, parsing stops at the first
/// invalid entry, so `-1` hides every device.
#[derive(Debug, Clone, Copy, Default)]
pub struct VisibleDevices;

impl DeviceProbe for VisibleDevices {
    fn cuda_device_count(&self) -> usize {
        std::env::var(CUDA_VISIBLE_DEVICES)
            .map(|value| count_visible_devices(&value))
            .unwrap_or(0)
    }
}

fn count_visible_devices(value: &str) -> usize {
    value
        .split(',')
        .map(str::trim)
        .take_while(|entry| {
            entry.parse::<u32>().is_ok() || entry.starts_with("GPU-") || entry.starts_with("MIG-")
        })
        .count()
}

/// Seeded generators for every subsystem that draws random numbers.
#[derive(Debug, Clone)]
pub struct SeededRngs {
    seed: u64,
    /// General-purpose generator for shuffling and sampling.
    pub general: StdRng,
    /// Generator for numeric-array initialisation.
    pub array: ChaCha8Rng,
    /// Generator for tensor operations on the CPU.
    pub tensor: ChaCha8Rng,
    /// One generator per CUDA device; empty when GPU seeding was skipped.
    pub cuda: Vec<ChaCha8Rng>,
}

impl SeededRngs {
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn gpu_seeded(&self) -> bool {
        !self.cuda.is_empty()
    }
}

/// Seed every random-number stream from `args.seed()`.
///
/// GPU streams are seeded only when `args.no_cuda()` is false and `probe`
/// reports at least one device; otherwise they are skipped silently.
///
/// # Examples
///
/// ```
/// use goemotions_korean::seed::{set_seed, CpuOnly, SeedSource};
/// use rand::Rng;
///
/// struct Args;
/// impl SeedSource for Args {
///     fn seed(&self) -> u64 { 42 }
///     fn no_cuda(&self) -> bool { true }
/// }
///
/// let mut first = set_seed(&Args, &CpuOnly);
/// let mut second = set_seed(&Args, &CpuOnly);
/// assert_eq!(first.general.random::<u64>(), second.general.random::<u64>());
/// assert!(!first.gpu_seeded());
/// ```
pub fn set_seed(args: &impl SeedSource, probe: &impl DeviceProbe) -> SeededRngs {
    let seed = args.seed();
    let devices = if args.no_cuda() {
        0
    } else {
        probe.cuda_device_count()
    };
    let cuda: Vec<ChaCha8Rng> = (GPU_STREAM_BASE..)
        .take(devices)
        .map(|stream| chacha_stream(seed, stream))
        .collect();
    tracing::info!(seed, gpu_streams = cuda.len(), "seeded random number generators");
    SeededRngs {
        seed,
        general: StdRng::seed_from_u64(seed),
        array: chacha_stream(seed, ARRAY_STREAM),
        tensor: chacha_stream(seed, TENSOR_STREAM),
        cuda,
    }
}

fn chacha_stream(seed: u64, stream: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(stream);
    rng
}
