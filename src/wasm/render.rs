use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{
    window, HtmlCanvasElement, WebGl2RenderingContext as GL, WebGlBuffer, WebGlProgram,
    WebGlUniformLocation,
};

use super::{input, loader, shader};
use crate::config::{AppConfig, RenderMode, ShaderParams};
use crate::driver::{Driver, Surface};
use crate::error::VizError;
use crate::uniforms::{self, UniformValues, A_POSITION, QUAD_VERTICES};
use crate::view::ViewState;

/// Uniform slots looked up once after linking. A slot the driver optimised
/// away is `None`, and writes to it are no-ops.
struct Locations {
    resolution: Option<WebGlUniformLocation>,
    data: Option<WebGlUniformLocation>,
    geometry_a: Option<WebGlUniformLocation>,
    geometry_b: Option<WebGlUniformLocation>,
    support: Option<WebGlUniformLocation>,
    resez: Option<WebGlUniformLocation>,
}

impl Locations {
    fn lookup(gl: &GL, program: &WebGlProgram) -> Self {
        let at = |name: &str| gl.get_uniform_location(program, name);
        Self {
            resolution: at(uniforms::U_RESOLUTION),
            data: at(uniforms::U_DATA),
            geometry_a: at(uniforms::U_GEOMETRY_A),
            geometry_b: at(uniforms::U_GEOMETRY_B),
            support: at(uniforms::U_SUPPORT),
            resez: at(uniforms::U_RESEZ),
        }
    }
}

/// Owns the linked program and the static quad.
pub struct Renderer {
    gl: GL,
    _program: WebGlProgram,
    _quad: WebGlBuffer,
    locations: Locations,
    values: UniformValues,
}

impl Renderer {
    pub fn new(
        gl: GL,
        program: WebGlProgram,
        params: &ShaderParams,
        width: u32,
        height: u32,
    ) -> Result<Self, VizError> {
        let quad = gl
            .create_buffer()
            .ok_or_else(|| VizError::Js("unable to create vertex buffer".into()))?;
        gl.bind_buffer(GL::ARRAY_BUFFER, Some(&quad));
        let vertices = js_sys::Float32Array::from(&QUAD_VERTICES[..]);
        gl.buffer_data_with_array_buffer_view(GL::ARRAY_BUFFER, &vertices, GL::STATIC_DRAW);

        let position = gl.get_attrib_location(&program, A_POSITION);
        if position < 0 {
            return Err(VizError::Link(format!("attribute `{A_POSITION}` is not active")));
        }
        gl.enable_vertex_attrib_array(position as u32);
        gl.vertex_attrib_pointer_with_i32(position as u32, 2, GL::FLOAT, false, 0, 0);
        gl.use_program(Some(&program));

        let locations = Locations::lookup(&gl, &program);
        let values = UniformValues::new(params, width, height, [0.0, 0.0, 1.0]);
        let renderer = Self { gl, _program: program, _quad: quad, locations, values };
        renderer.upload_static();
        Ok(renderer)
    }

    fn upload_static(&self) {
        let (gl, loc, v) = (&self.gl, &self.locations, &self.values);
        gl.uniform2f(loc.resolution.as_ref(), v.resolution[0], v.resolution[1]);
        gl.uniform4f(loc.data.as_ref(), v.data[0], v.data[1], v.data[2], v.data[3]);
        gl.uniform2f(loc.geometry_a.as_ref(), v.geometry_a[0], v.geometry_a[1]);
        gl.uniform2f(loc.support.as_ref(), v.support[0], v.support[1]);
        gl.uniform4f(loc.resez.as_ref(), v.resez[0], v.resez[1], v.resez[2], v.resez[3]);
    }
}

impl Surface for Renderer {
    fn resize(&mut self, width: u32, height: u32) {
        self.values = self.values.resized(width, height);
        self.upload_static();
    }

    fn draw(&mut self, view: &ViewState) {
        self.values.geometry_b = view.geometry_b();
        let [x0, y0, scale] = self.values.geometry_b;
        let [w, h] = self.values.resolution;

        self.gl.viewport(0, 0, w as i32, h as i32);
        self.gl.uniform3f(self.locations.geometry_b.as_ref(), x0, y0, scale);
        self.gl.clear(GL::COLOR_BUFFER_BIT);
        self.gl.draw_arrays(GL::TRIANGLES, 0, 6);
    }
}

pub type App = Driver<Renderer>;

fn window_size() -> Result<(u32, u32), VizError> {
    let window = window().ok_or_else(|| VizError::Js("no window".into()))?;
    let w = window.inner_width().map_err(VizError::js)?.as_f64().unwrap_or(0.0);
    let h = window.inner_height().map_err(VizError::js)?.as_f64().unwrap_or(0.0);
    Ok((w as u32, h as u32))
}

/// Builds the GL pipeline on `canvas`, wires input and starts drawing.
pub async fn start(canvas: HtmlCanvasElement, config: AppConfig) -> Result<(), VizError> {
    let (width, height) = window_size()?;
    canvas.set_width(width);
    canvas.set_height(height);

    let gl: GL = match canvas.get_context("webgl2").map_err(VizError::js)? {
        Some(ctx) => ctx.dyn_into().map_err(VizError::js)?,
        None => {
            if let Some(w) = window() {
                w.alert_with_message("WebGL is not supported!").ok();
            }
            return Err(VizError::ContextUnavailable);
        }
    };

    let sources = loader::load(&config.shader_source).await?;
    let program = shader::build_program(&gl, &sources)?;
    let renderer = Renderer::new(gl, program, &config.shader, width, height)?;

    let app = Rc::new(RefCell::new(App::new(
        ViewState::from_config(&config),
        renderer,
        config.render_mode,
    )));
    {
        // First frame regardless of mode.
        let mut app = app.borrow_mut();
        app.frame();
    }

    input::attach(&canvas, app.clone()).map_err(VizError::js)?;
    watch_resize(&canvas, app.clone()).map_err(VizError::js)?;
    if config.render_mode == RenderMode::Animation {
        start_loop(app).map_err(VizError::js)?;
    }
    log::info!("rendering {width}x{height}");
    Ok(())
}

fn watch_resize(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    // Resize canvas to fit window
    let resize_closure = {
        let canvas = canvas.clone();
        Closure::wrap(Box::new(move || match window_size() {
            Ok((w, h)) => {
                canvas.set_width(w);
                canvas.set_height(h);
                app.borrow_mut().resize(w, h);
            }
            Err(err) => log::error!("resize: {err}"),
        }) as Box<dyn FnMut()>)
    };
    window()
        .ok_or("no window")?
        .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref())?;
    resize_closure.forget();
    Ok(())
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<i32, JsValue> {
    window()
        .ok_or("no window")?
        .request_animation_frame(callback.as_ref().unchecked_ref())
}

fn start_loop(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
    // `f` holds the animation-frame closure so that we can keep calling
    // `request_animation_frame` recursively. Storing it inside an `Option`
    // allows us to create the `Closure` first and then obtain a reference to
    // it from within itself.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        app.borrow_mut().frame();

        // schedule next
        if let Some(callback) = f.borrow().as_ref() {
            if let Err(err) = request_frame(callback) {
                log::error!("requestAnimationFrame failed: {err:?}");
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        request_frame(callback)?;
    }
    Ok(())
}
