//! Render engine - distributes (frame, pixel) work units over a worker pool
//! through a single shared claim counter.
//!
//! A work unit is one pixel of one frame, identified by its flat index in
//! the output volume. Workers claim the next index with an atomic
//! fetch-add, so no unit is handed out twice and none is skipped. Claims
//! arrive in flat order, which keeps a worker's consecutive claims inside
//! one frame most of the time; each worker caches the geometry of the frame
//! it last touched and recomputes only on a frame change.

use std::cell::UnsafeCell;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread;

use log::{debug, warn};

use crate::schema::{ConfigError, RenderConfig};

use super::escape::{EscapeParams, divergence};
use super::geometry::FrameGeometry;

/// Rendered escape-time volume: `frames` frames of `width * height` values.
#[derive(Debug, Clone)]
pub struct EscapeVolume {
    /// Escape values, flattened as `frame * (width * height) + y * width + x`.
    pub values: Vec<f64>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Frames in the sequence.
    pub frames: u64,
}

impl EscapeVolume {
    /// Pixels per frame.
    #[inline]
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Flat index of `(frame, x, y)`.
    #[inline]
    pub fn idx(&self, frame: u64, x: u32, y: u32) -> usize {
        frame as usize * self.frame_len() + y as usize * self.width as usize + x as usize
    }

    /// Values of one frame.
    pub fn frame_values(&self, frame: u64) -> &[f64] {
        let len = self.frame_len();
        let start = frame as usize * len;
        &self.values[start..start + len]
    }
}

/// Accounting for one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderReport {
    /// Work units (pixels across all frames) in the volume.
    pub units: u64,
    /// Claim operations against the shared counter. A pooled run ends at
    /// `units + workers`: every worker's final claim overshoots.
    pub claims: u64,
    /// Workers that executed the render.
    pub workers: usize,
}

/// Render call failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Output buffer holds {actual} values but the volume needs {expected}")]
    BufferSize { expected: u64, actual: usize },
    #[error("Could not reserve memory for {values} escape values")]
    Allocation { values: u64 },
    #[error("Worker {started} of {requested} failed to start")]
    WorkerSpawn {
        started: usize,
        requested: usize,
        #[source]
        source: io::Error,
    },
}

/// Claim counter and stop flag for one render call.
///
/// Owned by the call itself, so independent renders never share state.
/// `Relaxed` suffices on the counter: claims only need to be unique and
/// monotonic, not ordered against other memory.
struct RenderSession {
    next_unit: AtomicU64,
    stop: AtomicBool,
}

impl RenderSession {
    fn new() -> Self {
        Self {
            next_unit: AtomicU64::new(0),
            stop: AtomicBool::new(false),
        }
    }

    /// Claim the next flat index.
    #[inline]
    fn claim(&self) -> u64 {
        self.next_unit.fetch_add(1, Ordering::Relaxed)
    }

    /// Total claims made so far.
    fn claims(&self) -> u64 {
        self.next_unit.load(Ordering::Relaxed)
    }

    /// Tell every worker to stop claiming work.
    fn request_stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    #[inline]
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Shared view of the output buffer whose slots workers write disjointly.
///
/// Slot indices come out of the session's claim counter, so no two workers
/// ever hold the same index; that uniqueness is the soundness argument for
/// the unchecked shared writes here. Nothing reads the buffer until the
/// workers are joined.
struct OutputSlots<'a> {
    slots: &'a [UnsafeCell<f64>],
}

// One writer per slot, no readers until join; see above.
unsafe impl Sync for OutputSlots<'_> {}

impl<'a> OutputSlots<'a> {
    fn new(buffer: &'a mut [f64]) -> Self {
        // UnsafeCell<f64> is repr(transparent) over f64.
        let ptr = buffer as *mut [f64] as *const [UnsafeCell<f64>];
        Self {
            slots: unsafe { &*ptr },
        }
    }

    /// Write one slot.
    ///
    /// # Safety
    ///
    /// `index` must have been claimed from the session counter by the
    /// calling worker, so that no other thread touches the same slot.
    #[inline]
    unsafe fn write(&self, index: usize, value: f64) {
        unsafe { *self.slots[index].get() = value };
    }
}

/// Read-only context shared by one render call's workers.
struct WorkerCtx<'a> {
    config: &'a RenderConfig,
    escape: EscapeParams,
    session: &'a RenderSession,
    slots: OutputSlots<'a>,
    units: u64,
}

fn worker_loop(ctx: &WorkerCtx<'_>) {
    let frame_len = ctx.config.frame_len();
    let width = u64::from(ctx.config.width);
    let mut geometry = FrameGeometry::for_frame(ctx.config, 0);

    while !ctx.session.stopped() {
        let unit = ctx.session.claim();
        if unit >= ctx.units {
            break;
        }

        let frame = unit / frame_len;
        let pixel = unit % frame_len;
        if frame != geometry.frame() {
            if frame == geometry.frame() + 1 {
                geometry.advance(ctx.config);
            } else {
                geometry = FrameGeometry::for_frame(ctx.config, frame);
            }
        }

        let x = (pixel % width) as u32;
        let y = (pixel / width) as u32;
        let value = divergence(geometry.point_at(x, y), &ctx.escape);
        // SAFETY: `unit` came out of the claim counter, so this worker is
        // the only writer of this slot.
        unsafe { ctx.slots.write(unit as usize, value) };
    }
}

fn render_sequential(config: &RenderConfig, escape: &EscapeParams, dst: &mut [f64]) {
    let mut geometry = FrameGeometry::for_frame(config, 0);
    let mut idx = 0;
    for frame in 0..config.frames {
        if frame > 0 {
            geometry.advance(config);
        }
        for y in 0..config.height {
            for x in 0..config.width {
                dst[idx] = divergence(geometry.point_at(x, y), escape);
                idx += 1;
            }
        }
    }
}

/// Zoom-sequence renderer for a validated configuration.
pub struct Renderer {
    config: RenderConfig,
    escape: EscapeParams,
    units: u64,
}

impl Renderer {
    /// Build a renderer, validating the configuration up front.
    pub fn new(config: RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let units = config.volume_len().ok_or(ConfigError::VolumeTooLarge)?;
        Ok(Self {
            config,
            escape: EscapeParams::new(),
            units,
        })
    }

    /// Configuration this renderer was built from.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render the whole sequence into `dst`, which must hold exactly
    /// `width * height * frames` values.
    ///
    /// A single worker runs the plain frames/rows/columns pass; more run
    /// the claim-counter pool. When a worker fails to start, the running
    /// workers are signalled to stop and drained before the error returns,
    /// leaving the buffer partially filled.
    pub fn render_into(&self, dst: &mut [f64]) -> Result<RenderReport, RenderError> {
        if dst.len() as u64 != self.units {
            return Err(RenderError::BufferSize {
                expected: self.units,
                actual: dst.len(),
            });
        }

        let workers = self.config.workers;
        if workers <= 1 {
            debug!("rendering {} units sequentially", self.units);
            render_sequential(&self.config, &self.escape, dst);
            return Ok(RenderReport {
                units: self.units,
                claims: self.units,
                workers: 1,
            });
        }

        debug!("rendering {} units on {workers} workers", self.units);
        let session = RenderSession::new();
        let ctx = WorkerCtx {
            config: &self.config,
            escape: self.escape,
            session: &session,
            slots: OutputSlots::new(dst),
            units: self.units,
        };

        let mut spawn_failure = None;
        thread::scope(|scope| {
            let mut handles = Vec::with_capacity(workers);
            for index in 0..workers {
                let ctx = &ctx;
                let spawned = thread::Builder::new()
                    .name(format!("render-{index}"))
                    .spawn_scoped(scope, move || worker_loop(ctx));
                match spawned {
                    Ok(handle) => handles.push(handle),
                    Err(source) => {
                        warn!(
                            "worker {index} failed to start; draining {} running workers",
                            handles.len()
                        );
                        session.request_stop();
                        spawn_failure = Some(RenderError::WorkerSpawn {
                            started: index,
                            requested: workers,
                            source,
                        });
                        break;
                    }
                }
            }
            for handle in handles {
                if let Err(panic) = handle.join() {
                    std::panic::resume_unwind(panic);
                }
            }
        });

        if let Some(failure) = spawn_failure {
            return Err(failure);
        }
        debug!("workers joined after {} claims", session.claims());
        Ok(RenderReport {
            units: self.units,
            claims: session.claims(),
            workers,
        })
    }

    /// Render the whole sequence into a freshly allocated volume.
    ///
    /// The buffer allocation is fallible; running out of memory reports
    /// [`RenderError::Allocation`] instead of aborting.
    pub fn render(&self) -> Result<EscapeVolume, RenderError> {
        let len = usize::try_from(self.units).map_err(|_| RenderError::Allocation {
            values: self.units,
        })?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|_| RenderError::Allocation { values: self.units })?;
        values.resize(len, 0.0);

        let report = self.render_into(&mut values)?;
        debug!(
            "render complete: {} claims across {} workers",
            report.claims, report.workers
        );
        Ok(EscapeVolume {
            values,
            width: self.config.width,
            height: self.config.height,
            frames: self.config.frames,
        })
    }
}
