use std::io::Write;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use life_backdrop::PixelSize;
use life_backdrop::config::Config;
use life_backdrop::config::SimulationParams;
use life_backdrop::coords::Point;
use life_backdrop::coords::grid_to_pixel;
use life_backdrop::driver::AnimationDriver;
use life_backdrop::driver::FrameHost;
use life_backdrop::driver::FrameRequest;
use life_backdrop::overlay::BlockOverlay;
use life_backdrop::surface::PixelCanvas;
use life_backdrop::terminal::BrailleFrame;
use life_backdrop::theme::ColorCache;
use life_backdrop::theme::SharedTheme;
use life_backdrop::theme::Theme;

use events::AppEvent;
use events::DriverEvent;
use events::Event;

mod events;
mod io;

const FRAMERATE: u32 = 60;
const FRAMETIME: Duration = Duration::from_millis(((1f64 / FRAMERATE as f64) * 1_000f64) as u64);

/// One braille dot per pixel makes the usual cell sizes far too coarse for a terminal
const TERMINAL_CELL_SIZE: PixelSize = 3;

/// Hands out frame callbacks once per pass of the main loop.
struct TerminalHost {
    canvas: PixelCanvas,
    next: u64,
    pending: Option<FrameRequest>,
}

impl FrameHost for TerminalHost {
    type Surface = PixelCanvas;

    fn surface(&mut self) -> Option<&mut PixelCanvas> {
        Some(&mut self.canvas)
    }

    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;

        let request = FrameRequest(self.next);
        self.pending = Some(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending == Some(request) {
            self.pending = None;
        }
    }
}

struct App {
    config: Config,
    theme: SharedTheme,

    host: TerminalHost,
    driver: AnimationDriver,

    blocks: PixelCanvas,
    overlay: BlockOverlay,

    frame: BrailleFrame,

    /// Where the user moved the overlay, in cells from the center of the screen
    shift: (i32, i32),
}

impl App {
    fn new(config: Config, cols: u16, rows: u16) -> anyhow::Result<Self> {
        let theme = SharedTheme::new(Theme::default());
        let frame = BrailleFrame::new(cols, rows);
        let (w, h) = frame.dots();

        let params = config.params_for_width(w)?;
        let driver = AnimationDriver::new(params, ColorCache::new(theme.clone()))
            .with_geometry(config.geometry)
            .with_rules(config.rules);

        let overlay = BlockOverlay::new(
            ColorCache::new(theme.clone()),
            config.geometry.with_cell_size(params.cell_size()),
        );

        let host = TerminalHost {
            canvas: PixelCanvas::new(w, h),
            next: 0,
            pending: None,
        };

        Ok(Self {
            config,
            theme,
            host,
            driver,
            blocks: PixelCanvas::new(w, h),
            overlay,
            frame,
            shift: (0, 0),
        })
    }

    fn start(&mut self) {
        let (w, h) = self.frame.dots();

        self.driver.start(&mut self.host, w, h);
        self.overlay.set_viewport(w, h);
        self.place_anchor();
    }

    fn resize(&mut self, cols: u16, rows: u16) -> anyhow::Result<()> {
        let before = self.frame.dots();
        self.frame.resize(cols, rows);

        let (w, h) = self.frame.dots();
        if (w, h) == before {
            return Ok(());
        }

        // resizing clears both canvases; the driver repaints on restart, the overlay once dirty
        self.host.canvas.resize(w, h);
        self.blocks.resize(w, h);

        let params = self.config.params_for_width(w)?;
        self.driver.reconfigure(&mut self.host, w, h, params);

        self.overlay.set_viewport(w, h);
        self.overlay.set_cell_size(params.cell_size());
        self.place_anchor();

        Ok(())
    }

    fn handle(&mut self, event: DriverEvent) -> anyhow::Result<()> {
        match event {
            DriverEvent::Interval(ms) => {
                let interval = self.config.interval.as_millis() as i64 + ms;
                self.config.interval = Duration::from_millis(interval.max(0) as u64);
                self.apply_config()?;
            }
            DriverEvent::Density(delta) => {
                let density = self.driver.params().density() + delta;
                self.config.density = Some(density.clamp(0f64, 1f64));
                self.apply_config()?;
            }
            DriverEvent::ToggleTheme => {
                let theme = self.theme.toggle();
                info!(?theme, "Theme toggled");

                self.driver.on_theme_changed(&mut self.host);
                self.overlay.on_theme_changed(&mut self.blocks);
            }
        }

        Ok(())
    }

    fn apply_config(&mut self) -> anyhow::Result<()> {
        let (w, _) = self.frame.dots();
        let params: SimulationParams = self.config.params_for_width(w)?;

        self.driver.set_params(&mut self.host, params);
        self.overlay.set_cell_size(params.cell_size());

        Ok(())
    }

    /// Centers the overlay on the screen, then applies the user's shift.
    fn place_anchor(&mut self) {
        let (w, h) = self.frame.dots();
        let cs = self.driver.params().cell_size();

        let center = Point::new(w as f64 / 2f64, h as f64 / 2f64);
        let (dx, dy) = (grid_to_pixel(self.shift.0, cs), grid_to_pixel(self.shift.1, cs));

        self.overlay.set_anchor(center.offset(dx, dy));
    }

    /// Delivers the pending frame callback, if any.
    fn tick(&mut self, now: Duration) {
        if let Some(request) = self.host.pending.take() {
            self.driver.on_frame(&mut self.host, request, now);
        }

        self.overlay.draw_if_dirty(&mut self.blocks);
    }

    fn present(&mut self, stdout: &mut impl Write) -> std::io::Result<()> {
        let colors = self.driver.colors();
        let (fg, bg) = (colors.cell, colors.background);

        let s = self.frame.render([&self.host.canvas, &self.blocks], bg);

        queue!(
            stdout,
            style::SetColors(style::Colors::new(fg.into(), bg.into())),
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        for line in s.lines() {
            queue!(stdout, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        stdout.flush()
    }
}

fn run(stdout: &mut impl Write) -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;
    let config = Config {
        cell_size: config.cell_size.or(Some(TERMINAL_CELL_SIZE)),
        ..config
    };

    let (cols, rows) = terminal::size()?;
    let mut app = App::new(config, cols, rows)?;
    app.start();

    let epoch = Instant::now();

    loop {
        let t = Instant::now();

        // Poll event for as long as FRAMETIME
        let event = if event::poll(FRAMETIME)? {
            io::convert_event(event::read()?)
        } else {
            None
        };

        match event {
            None => {}
            Some(Event::AppEvent(AppEvent::Exit)) => break,
            Some(Event::AppEvent(AppEvent::Resize { cols, rows })) => app.resize(cols, rows)?,
            Some(Event::AppEvent(AppEvent::MoveAnchor { dx, dy })) => {
                app.shift = (app.shift.0 + dx, app.shift.1 + dy);
                app.place_anchor();
            }
            Some(Event::DriverEvent(e)) => app.handle(e)?,
        }

        app.tick(epoch.elapsed());
        app.present(stdout)?;

        thread::sleep(FRAMETIME.saturating_sub(t.elapsed()));
    }

    app.driver.stop(&mut app.host);

    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout();

    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run(&mut stdout);

    execute!(
        stdout,
        style::ResetColor,
        cursor::Show,
        terminal::LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()?;

    result
}
