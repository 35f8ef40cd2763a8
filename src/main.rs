use anyhow::Context;
use glutin::{
    config::{Config, ConfigTemplateBuilder},
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::GetGlDisplay,
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use log::{error, info, warn, LevelFilter};
use raw_window_handle::HasRawWindowHandle;
use simple_logger::SimpleLogger;
use std::{ffi::CString, num::NonZeroU32, ptr};
use winit::{
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    window::{Window, WindowBuilder},
};

use spintri::{
    render::GlApi, utils::error::Result, AppError, FrameClock, RenderConfig, RenderPipeline, ResizeObserver, Viewport,
    TRIANGLE_VERTICES,
};

struct App {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
    pipeline: Option<RenderPipeline<GlApi>>,
    clock: FrameClock,
    fatal: Option<AppError>,
}

impl App {
    fn new(config: &RenderConfig) -> Result<(Self, EventLoop<()>)> {
        config.validate()?;

        let event_loop = EventLoop::new().map_err(|e| AppError::WindowCreation(e.to_string()))?;
        let window_builder = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, pick_config)
            .map_err(|e| AppError::WindowCreation(e.to_string()))?;
        let window = window.ok_or_else(|| AppError::WindowCreation("no window was created".into()))?;

        let (major, minor) = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(major, minor))))
            .with_profile(GlProfile::Core)
            .build(Some(window.raw_window_handle()));

        let gl_display = gl_config.display();

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attributes) }
            .map_err(|e| AppError::WindowCreation(format!("OpenGL {major}.{minor} context: {e}")))?;

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs) }
            .map_err(|e| AppError::WindowCreation(format!("GL surface: {e}")))?;

        let gl_context = gl_context
            .make_current(&gl_surface)
            .map_err(|e| AppError::WindowCreation(format!("make current: {e}")))?;

        if config.vsync {
            if let Err(e) = gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN)) {
                warn!("Failed to enable vsync: {}", e);
            }
        }

        // Load OpenGL functions
        gl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()) as *const _,
            Err(_) => ptr::null(),
        });
        if !GlApi::entry_points_loaded() {
            return Err(AppError::ApiBinding(
                "the driver did not provide the required OpenGL 3.3 functions".into(),
            ));
        }

        // The context is current on this thread and stays so for the life of `App`.
        let api = unsafe { GlApi::new() };
        let mut pipeline = RenderPipeline::build(api, config, &TRIANGLE_VERTICES)?;
        // The framebuffer is in physical pixels, which differ from the logical size on HiDPI.
        let size = window.inner_size();
        pipeline.on_resize(Viewport::new(size.width, size.height));

        info!("Created {}x{} window \"{}\"", config.width, config.height, config.title);

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
                pipeline: Some(pipeline),
                clock: FrameClock::start(),
                fatal: None,
            },
            event_loop,
        ))
    }

    /// Returns true when the loop should stop.
    fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => true,
            WindowEvent::Resized(size) => {
                if let (Some(width), Some(height)) =
                    (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                {
                    self.gl_surface.resize(&self.gl_context, width, height);
                }
                if let Some(pipeline) = &mut self.pipeline {
                    pipeline.on_resize(Viewport::new(size.width, size.height));
                }
                false
            }
            WindowEvent::RedrawRequested => {
                if let Some(pipeline) = &mut self.pipeline {
                    pipeline.render_frame(self.clock.elapsed_seconds());
                }
                match self.gl_surface.swap_buffers(&self.gl_context) {
                    Ok(()) => false,
                    Err(e) => {
                        let err = AppError::from(e);
                        error!("{}", err);
                        self.fatal = Some(err);
                        true
                    }
                }
            }
            _ => false,
        }
    }

    fn cleanup(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.teardown();
        }
    }
}

fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    // glutin only calls the picker with at least one matching config
    configs
        .reduce(|accum, config| {
            if config.num_samples() > accum.num_samples() {
                config
            } else {
                accum
            }
        })
        .expect("display offered no GL configs")
}

fn run() -> anyhow::Result<()> {
    let config = RenderConfig::default();
    let (mut app, event_loop) = App::new(&config)?;

    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop
        .run(|event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                if app.handle_window_event(&event) {
                    elwt.exit();
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            Event::LoopExiting => {
                app.cleanup();
            }
            _ => (),
        })
        .context("Event loop terminated abnormally")?;

    match app.fatal.take() {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}

fn main() {
    if let Err(e) = SimpleLogger::new().with_level(LevelFilter::Info).init() {
        eprintln!("Failed to initialize logger: {}", e);
    }

    match run() {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{:#}", e);
            std::process::exit(AppError::EXIT_CODE);
        }
    }
}
