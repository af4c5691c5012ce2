//! The animation loop behind the background.
//!
//! The driver never sleeps or waits. The host (a browser, a terminal loop, a test) grants frame
//! callbacks it has been asked for through [`FrameHost::request_frame`], and each callback either
//! does nothing but ask again, or runs exactly one tick: reseed or advance, then paint.
//!
//! ```notrust
//!                  viewport > 0
//!  Uninitialized ───────────────> Seeded ──tick──> Running <──tick──> Reseeding
//!        ^                          │                 │                  │
//!        └──── resize / params ─────┴─────────────────┴──────────────────┘
//!
//!  any state ── stop ──> Stopped
//! ```

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;
use tracing::info;
use tracing::trace;

use crate::PixelSize;
use crate::buffer::DoubleBuffer;
use crate::config::SimulationParams;
use crate::grid::Grid;
use crate::render::CellGeometry;
use crate::render::GridPaint;
use crate::render::render_grid;
use crate::rule_set::RuleSet;
use crate::sizing::GridDimensions;
use crate::sizing::compute_grid_dimensions;
use crate::surface::Surface;
use crate::theme::ColorCache;

/// Handle of one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequest(pub u64);

/// The environment a driver runs in.
pub trait FrameHost {
    type Surface: Surface + ?Sized;

    /// The surface to paint into, if it is currently available.
    fn surface(&mut self) -> Option<&mut Self::Surface>;

    /// Asks for [`AnimationDriver::on_frame`] to be called once, soon, with the returned request.
    fn request_frame(&mut self) -> FrameRequest;

    /// Withdraws a request. The host may still deliver it; the driver ignores it if so.
    fn cancel_frame(&mut self, request: FrameRequest);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// No buffers. Waiting for a non-zero viewport.
    Uninitialized,

    /// Buffers allocated and painted once, no tick has run yet.
    Seeded,

    /// The last tick advanced a generation.
    Running,

    /// The last tick found an empty grid and refilled it.
    Reseeding,

    /// Torn down. Nothing happens until the next [`AnimationDriver::start`].
    Stopped,
}

/// What a frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The callback was stale or the driver is not running.
    Ignored,

    /// Too early since the last tick; another frame was requested.
    Deferred,

    /// A new generation was computed and painted.
    Advanced,

    /// The population had died out; the grid was refilled and painted.
    Reseeded,
}

pub struct AnimationDriver {
    state: DriverState,

    params: SimulationParams,
    geometry: CellGeometry,
    rules: RuleSet,

    /// Pixel size of the surface, as last reported by the host
    viewport: (PixelSize, PixelSize),

    dims: Option<GridDimensions>,
    buffers: Option<DoubleBuffer>,
    colors: ColorCache,

    /// Host timestamp of the last tick that ran
    last_tick: Option<Duration>,

    /// The only frame callback this driver will act on
    pending: Option<FrameRequest>,

    /// Generations advanced since the last seed
    generation: u64,

    rng: StdRng,
}

impl AnimationDriver {
    pub fn new(params: SimulationParams, colors: ColorCache) -> Self {
        Self {
            state: DriverState::Uninitialized,
            params,
            geometry: CellGeometry::default().with_cell_size(params.cell_size()),
            rules: RuleSet::default(),
            viewport: (0, 0),
            dims: None,
            buffers: None,
            colors,
            last_tick: None,
            pending: None,
            generation: 0,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Gap and global offset to paint with. The cell size always comes from the parameters.
    pub fn with_geometry(mut self, geometry: CellGeometry) -> Self {
        self.geometry = geometry.with_cell_size(self.params.cell_size());
        self
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Makes seeding reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn geometry(&self) -> &CellGeometry {
        &self.geometry
    }

    pub fn colors(&self) -> &ColorCache {
        &self.colors
    }

    pub fn dimensions(&self) -> Option<GridDimensions> {
        self.dims
    }

    /// The generation currently on screen.
    pub fn current(&self) -> Option<&Grid> {
        self.buffers.as_ref().map(DoubleBuffer::current)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Live cells in the generation on screen.
    pub fn population(&self) -> usize {
        self.current().map_or(0, Grid::population)
    }

    pub fn pending_frame(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Begins a session on a `width x height` surface. Seeding waits until both are non-zero.
    pub fn start<H: FrameHost>(&mut self, host: &mut H, width: PixelSize, height: PixelSize) {
        self.viewport = (width, height);
        self.restart(host, "start");
    }

    /// Reports a new surface size. A different size discards the simulation and starts over.
    pub fn resize<H: FrameHost>(&mut self, host: &mut H, width: PixelSize, height: PixelSize) {
        if self.state == DriverState::Stopped || self.viewport == (width, height) {
            return;
        }

        self.viewport = (width, height);
        self.restart(host, "resize");
    }

    /// Replaces the interval, density and cell size. Any change discards the simulation and
    /// starts over.
    pub fn set_params<H: FrameHost>(&mut self, host: &mut H, params: SimulationParams) {
        if self.params == params {
            return;
        }

        self.params = params;
        self.geometry = self.geometry.with_cell_size(params.cell_size());

        if self.state != DriverState::Stopped {
            self.restart(host, "parameters changed");
        }
    }

    /// Applies a new surface size and new parameters together, restarting at most once.
    ///
    /// A stopped driver only stores the parameters.
    pub fn reconfigure<H: FrameHost>(
        &mut self,
        host: &mut H,
        width: PixelSize,
        height: PixelSize,
        params: SimulationParams,
    ) {
        if self.state == DriverState::Stopped {
            self.set_params(host, params);
            return;
        }

        if self.viewport == (width, height) && self.params == params {
            return;
        }

        self.viewport = (width, height);
        self.params = params;
        self.geometry = self.geometry.with_cell_size(params.cell_size());

        self.restart(host, "reconfigured");
    }

    /// Entry point for every frame callback the host delivers.
    ///
    /// `now` is the host's monotonic timestamp for the frame.
    pub fn on_frame<H: FrameHost>(
        &mut self,
        host: &mut H,
        request: FrameRequest,
        now: Duration,
    ) -> Tick {
        if self.pending != Some(request) {
            trace!(?request, state = ?self.state, "Ignoring stale frame callback");
            return Tick::Ignored;
        }
        self.pending = None;

        if self.buffers.is_none() {
            return Tick::Ignored;
        }

        let interval = self.params.interval();
        if self.last_tick.is_some_and(|last| now.saturating_sub(last) < interval) {
            trace!(?now, "Tick deferred");
            self.schedule(host);
            return Tick::Deferred;
        }
        self.last_tick = Some(now);

        let Some(buffers) = self.buffers.as_mut() else {
            return Tick::Ignored;
        };

        let tick = if buffers.current().is_empty() {
            debug!(generation = self.generation, "Population died out. Reseeding");

            buffers.reseed_current(self.params.density(), &mut self.rng);
            self.state = DriverState::Reseeding;

            Tick::Reseeded
        } else {
            buffers.step(&self.rules);
            self.generation += 1;
            self.state = DriverState::Running;

            Tick::Advanced
        };

        self.render(host);
        self.schedule(host);

        tick
    }

    /// Re-resolves the cached colors and repaints right away, without waiting for a tick.
    pub fn on_theme_changed<H: FrameHost>(&mut self, host: &mut H) {
        if self.state == DriverState::Stopped {
            trace!("Ignoring theme change on a stopped driver");
            return;
        }

        self.colors.refresh();
        debug!(colors = ?self.colors, "Theme changed");

        self.render(host);
    }

    /// Ends the session: cancels the pending frame and drops both buffers.
    pub fn stop<H: FrameHost>(&mut self, host: &mut H) {
        if self.state == DriverState::Stopped {
            return;
        }

        self.teardown(host);
        self.state = DriverState::Stopped;

        info!(generation = self.generation, "Animation stopped");
    }

    /// Paints the current generation. Returns whether anything was painted.
    pub fn render<H: FrameHost>(&self, host: &mut H) -> bool {
        let (Some(buffers), Some(dims)) = (&self.buffers, &self.dims) else {
            return false;
        };

        let Some(surface) = host.surface() else {
            trace!("Surface unavailable. Skipping paint");
            return false;
        };

        render_grid(
            surface,
            buffers.current(),
            &GridPaint::from(&self.colors),
            &self.geometry,
            dims.offset_x as i64,
            dims.offset_y as i64,
        );

        true
    }

    fn restart<H: FrameHost>(&mut self, host: &mut H, reason: &'static str) {
        self.teardown(host);
        self.state = DriverState::Uninitialized;

        info!(reason, viewport = ?self.viewport, "Restarting animation");

        self.seed(host);
    }

    fn teardown<H: FrameHost>(&mut self, host: &mut H) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }

        self.buffers = None;
        self.dims = None;
        self.last_tick = None;
    }

    /// Allocates both buffers and paints the first generation before any tick runs.
    fn seed<H: FrameHost>(&mut self, host: &mut H) {
        let (width, height) = self.viewport;
        if width == 0 || height == 0 {
            return;
        }

        let dims = compute_grid_dimensions(width, height, self.params.cell_size());
        let density = self.params.density();
        let buffers = DoubleBuffer::seeded(dims.rows, dims.cols, density, &mut self.rng);

        self.dims = Some(dims);
        self.buffers = Some(buffers);
        self.generation = 0;
        self.colors.refresh();
        self.state = DriverState::Seeded;

        info!(
            rows = dims.rows,
            cols = dims.cols,
            offset_x = dims.offset_x,
            offset_y = dims.offset_y,
            "Animation seeded"
        );

        self.render(host);
        self.schedule(host);
    }

    fn schedule<H: FrameHost>(&mut self, host: &mut H) {
        self.pending = Some(host.request_frame());
    }
}
