#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use raymarch_wasm::{Clock, GraphicsContext, ShaderStage, Surface};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader(ShaderStage),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader(u32, u32),
    DetachShader(u32, u32),
    LinkProgram(u32),
    DeleteProgram(u32),
    UseProgram(u32),
    CreateBuffer(u32),
    BindArrayBuffer(u32),
    DeleteBuffer(u32),
    BufferStatic(Vec<f32>),
    VertexAttribPointer { index: u32, size: i32 },
    EnableVertexAttribArray(u32),
    Uniform1f(String, f32),
    Uniform2f(String, f32, f32),
    Viewport(i32, i32, i32, i32),
    ClearColor([f32; 4]),
    Clear,
    DrawTriangleStrip { first: i32, count: i32 },
}

#[derive(Default)]
struct Inner {
    calls: RefCell<Vec<Call>>,
    next_id: Cell<u32>,
    sources: RefCell<HashMap<u32, (ShaderStage, String)>>,
    attached: RefCell<HashMap<u32, Vec<u32>>>,
    linked: RefCell<HashMap<u32, (String, String)>>,
    lost: Cell<bool>,
}

/// Stand-in GL context that records every call and emulates just enough of a
/// shader compiler to fail on `#error` and on unmatched varyings.
#[derive(Clone, Default)]
pub struct RecordingContext(Rc<Inner>);

impl RecordingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.0.calls.borrow_mut().clear();
    }

    pub fn lose_context(&self) {
        self.0.lost.set(true);
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.0.calls.borrow().iter().filter(|c| pred(*c)).count()
    }

    pub fn draws(&self) -> usize {
        self.count(|c| matches!(c, Call::DrawTriangleStrip { .. }))
    }

    pub fn times(&self) -> Vec<f32> {
        self.0
            .calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Uniform1f(name, t) if name == "u_time" => Some(*t),
                _ => None,
            })
            .collect()
    }

    pub fn resolutions(&self) -> Vec<(f32, f32)> {
        self.0
            .calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Uniform2f(name, w, h) if name == "u_resolution" => Some((*w, *h)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.0.calls.borrow_mut().push(call);
    }

    fn alloc(&self) -> u32 {
        let id = self.0.next_id.get() + 1;
        self.0.next_id.set(id);
        id
    }

    fn source(&self, shader: u32) -> Option<(ShaderStage, String)> {
        self.0.sources.borrow().get(&shader).cloned()
    }

    fn compile_error(&self, shader: u32) -> Option<String> {
        let (_, source) = self.source(shader)?;
        if source.trim().is_empty() {
            return Some(String::new());
        }
        source
            .lines()
            .position(|line| line.trim_start().starts_with("#error"))
            .map(|line| format!("ERROR: 0:{}: '#error' : syntax error", line + 1))
    }

    fn link_error(&self, program: u32) -> Option<String> {
        let attached = self.0.attached.borrow().get(&program).cloned()?;
        let mut vertex = String::new();
        let mut fragment = String::new();
        for shader in attached {
            match self.source(shader) {
                Some((ShaderStage::Vertex, src)) => vertex = src,
                Some((ShaderStage::Fragment, src)) => fragment = src,
                None => {}
            }
        }
        fragment
            .lines()
            .map(str::trim)
            .filter_map(|line| line.strip_prefix("in "))
            .find(|decl| !vertex.contains(&format!("out {decl}")))
            .map(|decl| format!("ERROR: Varying `{decl}` not written by vertex shader"))
    }
}

impl GraphicsContext for RecordingContext {
    type Shader = u32;
    type Program = u32;
    type Buffer = u32;
    type UniformLocation = String;

    fn create_shader(&self, stage: ShaderStage) -> Option<u32> {
        self.record(Call::CreateShader(stage));
        let id = self.alloc();
        self.0.sources.borrow_mut().insert(id, (stage, String::new()));
        Some(id)
    }

    fn shader_source(&self, shader: &u32, source: &str) {
        if let Some(entry) = self.0.sources.borrow_mut().get_mut(shader) {
            entry.1 = source.to_string();
        }
    }

    fn compile_shader(&self, shader: &u32) {
        self.record(Call::CompileShader(*shader));
    }

    fn compile_status(&self, shader: &u32) -> bool {
        self.compile_error(*shader).is_none()
    }

    fn shader_info_log(&self, shader: &u32) -> Option<String> {
        Some(self.compile_error(*shader).unwrap_or_default())
    }

    fn delete_shader(&self, shader: &u32) {
        self.record(Call::DeleteShader(*shader));
    }

    fn create_program(&self) -> Option<u32> {
        let id = self.alloc();
        self.record(Call::CreateProgram(id));
        Some(id)
    }

    fn attach_shader(&self, program: &u32, shader: &u32) {
        self.record(Call::AttachShader(*program, *shader));
        self.0
            .attached
            .borrow_mut()
            .entry(*program)
            .or_default()
            .push(*shader);
    }

    fn detach_shader(&self, program: &u32, shader: &u32) {
        self.record(Call::DetachShader(*program, *shader));
    }

    fn link_program(&self, program: &u32) {
        self.record(Call::LinkProgram(*program));
        if self.link_error(*program).is_some() {
            return;
        }
        let attached = self.0.attached.borrow().get(program).cloned().unwrap_or_default();
        let mut pair = (String::new(), String::new());
        for shader in attached {
            match self.source(shader) {
                Some((ShaderStage::Vertex, src)) => pair.0 = src,
                Some((ShaderStage::Fragment, src)) => pair.1 = src,
                None => {}
            }
        }
        self.0.linked.borrow_mut().insert(*program, pair);
    }

    fn link_status(&self, program: &u32) -> bool {
        self.0.linked.borrow().contains_key(program)
    }

    fn program_info_log(&self, program: &u32) -> Option<String> {
        Some(self.link_error(*program).unwrap_or_default())
    }

    fn delete_program(&self, program: &u32) {
        self.record(Call::DeleteProgram(*program));
    }

    fn use_program(&self, program: &u32) {
        self.record(Call::UseProgram(*program));
    }

    fn create_buffer(&self) -> Option<u32> {
        let id = self.alloc();
        self.record(Call::CreateBuffer(id));
        Some(id)
    }

    fn bind_array_buffer(&self, buffer: &u32) {
        self.record(Call::BindArrayBuffer(*buffer));
    }

    fn delete_buffer(&self, buffer: &u32) {
        self.record(Call::DeleteBuffer(*buffer));
    }

    fn buffer_static_f32(&self, data: &[f32]) {
        self.record(Call::BufferStatic(data.to_vec()));
    }

    fn attrib_location(&self, program: &u32, name: &str) -> Option<u32> {
        let linked = self.0.linked.borrow();
        let (vertex, _) = linked.get(program)?;
        vertex
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with("in "))
            .position(|line| line.trim_end_matches(';').ends_with(&format!(" {name}")))
            .map(|slot| slot as u32)
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32) {
        self.record(Call::VertexAttribPointer { index, size });
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableVertexAttribArray(index));
    }

    fn uniform_location(&self, program: &u32, name: &str) -> Option<String> {
        let linked = self.0.linked.borrow();
        let (_, fragment) = linked.get(program)?;
        fragment
            .lines()
            .map(str::trim)
            .any(|line| line.starts_with("uniform ") && line.ends_with(&format!(" {name};")))
            .then(|| name.to_string())
    }

    fn uniform1f(&self, location: &String, x: f32) {
        self.record(Call::Uniform1f(location.clone(), x));
    }

    fn uniform2f(&self, location: &String, x: f32, y: f32) {
        self.record(Call::Uniform2f(location.clone(), x, y));
    }

    fn viewport(&self, x: i32, y: i32, width: i32, height: i32) {
        self.record(Call::Viewport(x, y, width, height));
    }

    fn clear_color(&self, r: f32, g: f32, b: f32, a: f32) {
        self.record(Call::ClearColor([r, g, b, a]));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn draw_triangle_strip(&self, first: i32, count: i32) {
        self.record(Call::DrawTriangleStrip { first, count });
    }

    fn is_context_lost(&self) -> bool {
        self.0.lost.get()
    }
}

/// Window-sized surface whose size the test controls.
pub struct FakeSurface {
    context: Option<RecordingContext>,
    display: Cell<(u32, u32)>,
    pub resizes: RefCell<Vec<(u32, u32)>>,
}

impl FakeSurface {
    pub fn new(context: RecordingContext, width: u32, height: u32) -> Self {
        Self {
            context: Some(context),
            display: Cell::new((width, height)),
            resizes: RefCell::new(Vec::new()),
        }
    }

    pub fn without_context() -> Self {
        Self {
            context: None,
            display: Cell::new((800, 600)),
            resizes: RefCell::new(Vec::new()),
        }
    }

    pub fn set_display_size(&self, width: u32, height: u32) {
        self.display.set((width, height));
    }
}

impl Surface for FakeSurface {
    type Context = RecordingContext;

    fn acquire_context(&self) -> Option<RecordingContext> {
        self.context.clone()
    }

    fn display_size(&self) -> (u32, u32) {
        self.display.get()
    }

    fn resize(&self, width: u32, height: u32) {
        self.resizes.borrow_mut().push((width, height));
    }
}

/// Clock advanced by hand.
#[derive(Clone, Default)]
pub struct ManualClock(Rc<Cell<f64>>);

impl ManualClock {
    pub fn set(&self, seconds: f64) {
        self.0.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        self.0.set(self.0.get() + seconds);
    }
}

impl Clock for ManualClock {
    fn elapsed_seconds(&self) -> f64 {
        self.0.get()
    }
}

thread_local! {
    static RECORDS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

/// Global logger that keeps records on the thread that emitted them, so
/// parallel tests only see their own output.
struct CaptureLogger;

impl log::Log for CaptureLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        RECORDS.with(|r| r.borrow_mut().push((record.level(), record.args().to_string())));
    }

    fn flush(&self) {}
}

static CAPTURE: CaptureLogger = CaptureLogger;

/// Installs the capturing logger and drops anything recorded so far.
pub fn capture_logs() {
    static INSTALL: std::sync::Once = std::sync::Once::new();
    INSTALL.call_once(|| {
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);
    });
    RECORDS.with(|r| r.borrow_mut().clear());
}

/// Error-level messages logged on this thread since `capture_logs`.
pub fn logged_errors() -> Vec<String> {
    RECORDS.with(|r| {
        r.borrow()
            .iter()
            .filter(|(level, _)| *level == log::Level::Error)
            .map(|(_, msg)| msg.clone())
            .collect()
    })
}
