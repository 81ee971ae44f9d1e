//! Desktop demo for the trellis widget toolkit.
//!
//! Renders an element tree in an SDL2 window via `embedded-graphics-simulator`
//! and feeds it mouse and keyboard input. A synthetic signal streams into the
//! plot so cache reuse and partial redraws can be watched with
//! `RUST_LOG=debug`.
//!
//! # Key bindings
//!
//! | Key              | Action                       |
//! |------------------|------------------------------|
//! | Up / Down        | Move the list selection      |
//! | Space / Return   | Activate the selected row    |
//! | Escape           | Close an open drop-down      |
//! | Q                | Quit                         |

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::sdl2::{Keycode, MouseButton as SdlMouseButton};
use embedded_graphics_simulator::{
    OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
};
use log::{debug, error, info};

use trellis::ui::element::{downcast_mut, downcast_ref, find, find_mut};
use trellis::ui::{
    BitmapHandle, CallbackFlow, CallbackKind, ComboBox, DataPoint, DataSeries,
    Dimensions, Element, ElementConfig, ElementId, EventContext, FocusTracker, Frame, HGroup,
    HJustify, InputEvent, Key, Label, ListGroup, ListRow, MonoFontBackend, MouseButton, Plot,
    RangeConfig, RenderContext, TextSize, ToggleButton, UiResult, VGroup, WindowId,
    dispatch_event, render_popups,
};

// ---------------------------------------------------------------------------
// Display constants
// ---------------------------------------------------------------------------

const DISPLAY_WIDTH_PX: u32 = 320;
const DISPLAY_HEIGHT_PX: u32 = 240;

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 2;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Interval between synthetic samples.
const SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Seconds of signal kept on the plot.
const PLOT_WINDOW_SECS: f32 = 20.0;

const MAIN_WINDOW: WindowId = WindowId(1);

// ---------------------------------------------------------------------------
// Signal generation
// ---------------------------------------------------------------------------

const WAVEFORMS: [&str; 3] = ["Sine", "Square", "Sawtooth"];

fn waveform(index: usize, t: f32) -> f32 {
    let phase = (t / 4.0).fract();
    match index {
        1 => {
            if phase < 0.5 {
                1.0
            } else {
                -1.0
            }
        }
        2 => phase * 2.0 - 1.0,
        _ => (phase * std::f32::consts::TAU).sin(),
    }
}

// ---------------------------------------------------------------------------
// Demo tree
// ---------------------------------------------------------------------------

/// The element tree plus ids of the parts the main loop drives.
struct Demo {
    root: VGroup,
    combo: ElementId,
    plot: ElementId,
    paused: Rc<Cell<bool>>,
}

fn build_demo() -> UiResult<Demo> {
    let paused = Rc::new(Cell::new(false));

    let mut pause = ToggleButton::new("Pause");
    let flag = paused.clone();
    pause.base_mut().on(CallbackKind::OnActivated, move |_| {
        flag.set(true);
        CallbackFlow::Continue
    });
    let flag = paused.clone();
    pause.base_mut().on(CallbackKind::OnDeactivated, move |_| {
        flag.set(false);
        CallbackFlow::Continue
    });

    let mut combo = ComboBox::new();
    for name in WAVEFORMS {
        combo.add_entry(name);
    }
    let combo_id = combo.id();

    let toolbar = HGroup::new()
        .with_config(ElementConfig::new().with_h_fill(true))
        .with_element(pause)?
        .with_element(combo)?
        .with_element(
            Label::new("trellis demo")
                .with_font(TextSize::Small)
                .with_justify(HJustify::Right)
                .with_config(ElementConfig::new().with_h_fill(true)),
        )?;

    let mut channels = ListGroup::new().with_config(ElementConfig::new().with_v_fill(true));
    for name in ["Channel A", "Channel B", "Channel C"] {
        let mut row = ListRow::new().with_element(Label::new(name).with_justify(HJustify::Left))?;
        let label = name.to_owned();
        row.base_mut().on(CallbackKind::OnActivated, move |_| {
            info!("{} activated", label);
            CallbackFlow::Continue
        });
        channels.add_row(row)?;
    }

    let mut plot = Plot::new()?.with_config(ElementConfig::new().fill_all());
    plot.set_title("Signal")?;
    plot.set_x_label("seconds")?;
    plot.set_y_label("amplitude")?;
    plot.set_y_range(RangeConfig::Fixed {
        min: -1.2,
        max: 1.2,
    })?;
    plot.add_data(DataSeries::new(WAVEFORMS[0]))?;
    let plot_id = plot.id();

    let body = HGroup::new()
        .with_config(ElementConfig::new().fill_all())
        .with_element(Frame::new().with_element(channels)?)?
        .with_element(plot)?;

    let mut root = VGroup::new()
        .with_config(ElementConfig::new().fill_all())
        .with_element(toolbar)?
        .with_element(body)?;
    root.set_window(MAIN_WINDOW, 0)?;

    Ok(Demo {
        root,
        combo: combo_id,
        plot: plot_id,
        paused,
    })
}

impl Demo {
    fn waveform_index(&self) -> usize {
        find(&self.root, self.combo)
            .and_then(|e| downcast_ref::<ComboBox>(e).ok())
            .and_then(|combo| combo.active_index())
            .unwrap_or(0)
    }

    /// Replace the plotted series with the last `PLOT_WINDOW_SECS` of samples.
    fn publish(&mut self, samples: &[DataPoint], now: f32) -> UiResult<()> {
        let index = self.waveform_index();
        let Some(element) = find_mut(&mut self.root, self.plot) else {
            return Ok(());
        };
        let plot = downcast_mut::<Plot>(element)?;
        plot.set_data(
            0,
            DataSeries::new(WAVEFORMS[index]).with_points(samples.iter().copied()),
        )?;
        plot.set_x_range(RangeConfig::Fixed {
            min: now - PLOT_WINDOW_SECS,
            max: now,
        })
    }
}

// ---------------------------------------------------------------------------
// Input mapping
// ---------------------------------------------------------------------------

fn map_button(button: SdlMouseButton) -> Option<MouseButton> {
    match button {
        SdlMouseButton::Left => Some(MouseButton::Left),
        SdlMouseButton::Middle => Some(MouseButton::Middle),
        SdlMouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

fn map_key(keycode: Keycode) -> Option<Key> {
    match keycode {
        Keycode::Up => Some(Key::Up),
        Keycode::Down => Some(Key::Down),
        Keycode::Left => Some(Key::Left),
        Keycode::Right => Some(Key::Right),
        Keycode::Space => Some(Key::Space),
        Keycode::Return | Keycode::KpEnter => Some(Key::Return),
        Keycode::Escape => Some(Key::Escape),
        _ => None,
    }
}

fn map_event(event: SimulatorEvent) -> Option<InputEvent> {
    match event {
        SimulatorEvent::MouseButtonDown { mouse_btn, point } => Some(InputEvent::MouseDown {
            point,
            button: map_button(mouse_btn)?,
        }),
        SimulatorEvent::MouseButtonUp { mouse_btn, point } => Some(InputEvent::MouseUp {
            point,
            button: map_button(mouse_btn)?,
        }),
        SimulatorEvent::MouseMove { point } => Some(InputEvent::MouseMotion { point }),
        SimulatorEvent::KeyDown { keycode, .. } => map_key(keycode).map(InputEvent::KeyDown),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Bitmaps drawn in the last frame, used to skip unchanged frames.
#[derive(Default)]
struct Presented {
    root: Option<BitmapHandle>,
    popups: Vec<(Point, BitmapHandle)>,
}

impl Presented {
    fn matches(&self, root: &BitmapHandle, popups: &[(Point, BitmapHandle)]) -> bool {
        self.root.as_ref().is_some_and(|r| Rc::ptr_eq(r, root))
            && self.popups.len() == popups.len()
            && self
                .popups
                .iter()
                .zip(popups)
                .all(|((pa, a), (pb, b))| pa == pb && Rc::ptr_eq(a, b))
    }
}

fn present(
    demo: &mut Demo,
    ctx: &RenderContext<'_>,
    display: &mut SimulatorDisplay<Rgb565>,
    presented: &mut Presented,
) -> UiResult<()> {
    let frame = demo
        .root
        .render(Dimensions::new(DISPLAY_WIDTH_PX as i32, DISPLAY_HEIGHT_PX as i32), ctx)?;
    let popups = render_popups(&mut demo.root, ctx)?;
    if presented.matches(&frame, &popups) {
        return Ok(());
    }

    debug!("Presenting frame with {} popup(s)", popups.len());
    let _ = display.clear(Rgb565::WHITE);
    let _ = frame.flush(display, Point::zero());
    for (at, popup) in &popups {
        let _ = popup.flush(display, *at);
    }
    presented.root = Some(frame);
    presented.popups = popups;
    Ok(())
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();
    info!("Starting trellis simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );

    let mut demo = match build_demo() {
        Ok(demo) => demo,
        Err(e) => {
            error!("Failed to build UI: {}", e);
            return;
        }
    };

    let mut display =
        SimulatorDisplay::<Rgb565>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
    let output_settings = OutputSettingsBuilder::new().scale(WINDOW_SCALE).build();
    let mut window = Window::new("Trellis Simulator", &output_settings);

    let fonts = MonoFontBackend;
    let ctx = RenderContext::with_fonts(&fonts);
    let mut focus = FocusTracker::default();
    let mut presented = Presented::default();

    let started = Instant::now();
    let mut last_sample = Instant::now();
    let mut samples: Vec<DataPoint> = Vec::new();

    // The SDL window is lazily initialized on the first `update()` call.
    // We must call `update()` once before `events()` or it will panic.
    if let Err(e) = present(&mut demo, &ctx, &mut display, &mut presented) {
        error!("Render error: {}", e);
    }
    window.update(&display);

    'running: loop {
        let frame_start = Instant::now();

        // --- SDL events ---------------------------------------------------
        for event in window.events() {
            match event {
                SimulatorEvent::Quit => break 'running,
                SimulatorEvent::KeyDown {
                    keycode: Keycode::Q,
                    ..
                } => break 'running,
                other => {
                    let Some(input) = map_event(other) else {
                        continue;
                    };
                    let now_ms = started.elapsed().as_millis() as u64;
                    let mut event_ctx = EventContext::new(&mut focus, now_ms);
                    let state = dispatch_event(&mut demo.root, &input, &mut event_ctx);
                    debug!("{:?} -> {:?}", input, state);
                }
            }
        }

        // --- Synthetic signal ---------------------------------------------
        if last_sample.elapsed() >= SAMPLE_INTERVAL {
            last_sample = Instant::now();
            if !demo.paused.get() {
                let t = started.elapsed().as_secs_f32();
                samples.push(DataPoint::new(t, waveform(demo.waveform_index(), t)));
                samples.retain(|p| p.x >= t - PLOT_WINDOW_SECS);
                if let Err(e) = demo.publish(&samples, t) {
                    error!("Plot update failed: {}", e);
                }
            }
        }

        // --- Render -------------------------------------------------------
        if let Err(e) = present(&mut demo, &ctx, &mut display, &mut presented) {
            error!("Render error: {}", e);
        }
        window.update(&display);

        // --- Frame pacing -------------------------------------------------
        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
    }

    info!("Simulator exiting");
}
