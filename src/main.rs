// crashlens demo: a bouncing-ball cart that fails on purpose

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::rc::Rc;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crashlens::backend::TerminalHost;
use crashlens::config::ExplorerConfig;
use crashlens::errors::{ConfigError, Fault};
use crashlens::host::{Binding, Canvas, FontMode, FrameInfo, Introspect, SourceId};
use crashlens::model::value::{HostObject, Opaque, Table, Value};
use crashlens::shim::{Completion, Interceptor, Lifecycle};

/// Tick at which the cart fails when `--fail-at` is not given
const DEFAULT_FAIL_TICK: u64 = 90;

const TICK: Duration = Duration::from_millis(33);

struct Options {
    small_font: bool,
    fail_at: u64,
    log: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Options, ConfigError> {
    let mut options = Options {
        small_font: false,
        fail_at: DEFAULT_FAIL_TICK,
        log: None,
    };

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--small-font" => options.small_font = true,
            "--fail-at" => {
                let value = iter.next().ok_or_else(|| ConfigError::InvalidArgument {
                    argument: arg.clone(),
                    message: "expected a tick number".to_string(),
                })?;
                options.fail_at = value.parse().map_err(|e| ConfigError::InvalidArgument {
                    argument: value.clone(),
                    message: format!("{}", e),
                })?;
            }
            "--log" => {
                let path = iter.next().ok_or_else(|| ConfigError::InvalidArgument {
                    argument: arg.clone(),
                    message: "expected a file path".to_string(),
                })?;
                options.log = Some(path.clone());
            }
            other => {
                return Err(ConfigError::InvalidArgument {
                    argument: other.to_string(),
                    message: "unknown option".to_string(),
                })
            }
        }
    }

    Ok(options)
}

/// Route tracing output to a file; the terminal belongs to the UI
fn init_logging(path: &str) -> io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("crashlens");

    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprintln!(
                "Usage: {} [--small-font] [--fail-at <tick>] [--log <file>]",
                program_name
            );
            std::process::exit(1);
        }
    };

    if let Some(path) = &options.log {
        init_logging(path)?;
    }
    // Caught panics still run the hook; keep them off the terminal
    std::panic::set_hook(Box::new(|panic| {
        error!(%panic, "panic");
    }));

    let config = ExplorerConfig {
        initial_font: if options.small_font {
            FontMode::Small
        } else {
            FontMode::Large
        },
        ..ExplorerConfig::default()
    };

    let scene = Rc::new(RefCell::new(Scene::new(options.fail_at)));
    let update_scene = Rc::clone(&scene);
    let draw_scene = Rc::clone(&scene);
    let lifecycle = Lifecycle::new(
        move |host: &mut TerminalHost| update_scene.borrow_mut().update(host),
        move |host: &mut TerminalHost| draw_scene.borrow().draw(host),
    )
    .with_init(|host: &mut TerminalHost| {
        host.clear(0);
        Ok(Completion::Finished)
    });
    let mut interceptor = Interceptor::new(lifecycle, config)?;

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (width, height) = crossterm::terminal::size()?;
    let mut host = TerminalHost::new(width, height);
    info!(width, height, fail_at = options.fail_at, "demo started");

    let res = run(&mut terminal, &mut host, &mut interceptor);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    for line in host.console() {
        eprintln!("{}", line);
    }
    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    host: &mut TerminalHost,
    interceptor: &mut Interceptor<TerminalHost>,
) -> io::Result<()> {
    // Explorer failures are already logged to the console; keep ticking
    let _ = interceptor.init(host);

    loop {
        let started = Instant::now();
        host.begin_tick();
        while let Some(remaining) = TICK.checked_sub(started.elapsed()) {
            if !event::poll(remaining)? {
                break;
            }
            host.handle_event(&event::read()?);
        }
        if host.quit_requested() {
            break;
        }

        let _ = interceptor.update(host);
        let _ = interceptor.draw(host);
        terminal.draw(|frame| frame.render_widget(&*host, frame.area()))?;
    }

    Ok(())
}

struct Ball {
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    color: u8,
}

impl Ball {
    fn to_value(&self, world: &Rc<Table>) -> Value {
        let table = Table::new();
        table.set(Value::text("x"), Value::Number(self.x as f64));
        table.set(Value::text("y"), Value::Number(self.y as f64));
        table.set(Value::text("vx"), Value::Number(self.vx as f64));
        table.set(Value::text("vy"), Value::Nil);
        table.set(Value::text("color"), Value::Number(self.color as f64));
        table.set(Value::text("world"), Value::compound(world.clone()));
        Value::compound(table)
    }
}

/// A sprite sheet that cannot describe itself before it is loaded
struct Sprites;

impl HostObject for Sprites {
    fn type_name(&self) -> &str {
        "userdata"
    }

    fn to_text(&self) -> Result<Option<String>, Fault> {
        Err(Fault::new("sprite sheet not loaded"))
    }
}

struct Scene {
    tick: u64,
    fail_at: u64,
    balls: Vec<Ball>,
    world: Rc<Table>,
}

impl Scene {
    fn new(fail_at: u64) -> Self {
        let balls = (0..5)
            .map(|i| Ball {
                x: 4.0 + i as f32 * 7.0,
                y: 3.0 + i as f32 * 2.0,
                vx: 0.6 + i as f32 * 0.15,
                vy: 0.4,
                color: 8 + i as u8,
            })
            .collect();

        let world = Table::new();
        world.set(Value::text("gravity"), Value::Number(0.05));
        world.set(Value::text("title"), Value::text("bounce\tdemo\n"));
        world.set(Value::Number(1.0), Value::Bool(true));
        world.set(Value::Bool(false), Value::text("off"));
        world.set(Value::text("self"), Value::compound(world.clone()));

        Scene {
            tick: 0,
            fail_at,
            balls,
            world,
        }
    }

    fn update(&mut self, host: &mut TerminalHost) -> Result<Completion, Fault> {
        self.tick += 1;
        let bounds = host.screen_size();
        let world = Rc::clone(&self.world);
        world.set(Value::text("tick"), Value::Number(self.tick as f64));

        let mut stack = ShadowStack::default();
        stack.enter_native("host tick");
        stack.enter("_update", line!());
        stack.local("(for state)", Value::Nil);
        stack.local("tick", Value::Number(self.tick as f64));
        stack.local("sprites", Value::Other(Rc::new(Sprites)));
        stack.local("on_hit", Value::Function(Opaque::new("function")));
        stack.upvalue("world", Value::compound(world.clone()));

        let doomed = self.tick >= self.fail_at;
        for (index, ball) in self.balls.iter_mut().enumerate() {
            stack.at(line!());
            move_ball(&mut stack, ball, index, bounds, doomed, &world)?;
        }
        stack.leave();
        Ok(Completion::Finished)
    }

    fn draw(&self, host: &mut TerminalHost) -> Result<Completion, Fault> {
        host.clear(0);
        let backdrop = if self.tick % 20 < 10 {
            (0x1d, 0x2b, 0x53)
        } else {
            (0x29, 0x36, 0x6f)
        };
        host.set_palette(1, backdrop);
        let title = format!("bounce  tick {}  fails at {}", self.tick, self.fail_at);
        host.print(&title, 1, 0, 7);
        for ball in &self.balls {
            let (x, y) = (ball.x.round() as i32, ball.y.round() as i32);
            host.print("o", x, y, ball.color);
        }
        Ok(Completion::Finished)
    }
}

fn move_ball(
    stack: &mut ShadowStack,
    ball: &mut Ball,
    index: usize,
    bounds: (i32, i32),
    doomed: bool,
    world: &Rc<Table>,
) -> Result<(), Fault> {
    stack.enter("move_ball", line!());
    stack.local("ball", ball.to_value(world));
    stack.local("index", Value::Number(index as f64 + 1.0));
    stack.local("width", Value::Number(bounds.0 as f64));
    stack.local("height", Value::Number(bounds.1 as f64));

    ball.x += ball.vx;
    if ball.x < 0.0 || ball.x >= bounds.0 as f32 {
        ball.vx = -ball.vx;
        ball.x = ball.x.clamp(0.0, (bounds.0 - 1).max(0) as f32);
    }

    stack.at(line!());
    apply_gravity(stack, ball, bounds.1, doomed && index == 2)?;
    stack.leave();
    Ok(())
}

fn apply_gravity(
    stack: &mut ShadowStack,
    ball: &mut Ball,
    height: i32,
    doomed: bool,
) -> Result<(), Fault> {
    stack.enter("apply_gravity", line!());
    stack.local("vy", Value::Number(ball.vy as f64));

    if doomed {
        let message = "attempt to perform arithmetic on a nil value (field 'vy')";
        stack.at(line!() + 1);
        return Err(stack.fault(message));
    }

    ball.vy += 0.05;
    ball.y += ball.vy;
    if ball.y >= height as f32 - 1.0 {
        ball.vy = -ball.vy.abs() * 0.9;
        ball.y = height as f32 - 1.0;
    }
    stack.leave();
    Ok(())
}

#[derive(Clone)]
struct ShadowFrame {
    function: &'static str,
    source: Option<SourceId>,
    line_defined: u32,
    line: Option<u32>,
    locals: Vec<Binding>,
    upvalues: Vec<Binding>,
}

/// Call stack the demo keeps alongside its real one, outermost first
#[derive(Clone, Default)]
struct ShadowStack {
    frames: Vec<ShadowFrame>,
}

impl ShadowStack {
    fn enter_native(&mut self, function: &'static str) {
        self.frames.push(ShadowFrame {
            function,
            source: None,
            line_defined: 0,
            line: None,
            locals: Vec::new(),
            upvalues: Vec::new(),
        });
    }

    fn enter(&mut self, function: &'static str, line_defined: u32) {
        self.frames.push(ShadowFrame {
            function,
            source: Some(SourceId::File(file!().to_string())),
            line_defined,
            line: Some(line_defined),
            locals: Vec::new(),
            upvalues: Vec::new(),
        });
    }

    fn leave(&mut self) {
        self.frames.pop();
    }

    fn at(&mut self, line: u32) {
        if let Some(frame) = self.frames.last_mut() {
            frame.line = Some(line);
        }
    }

    fn local(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.locals.push(Binding::new(name, value));
        }
    }

    fn upvalue(&mut self, name: &str, value: Value) {
        if let Some(frame) = self.frames.last_mut() {
            frame.upvalues.push(Binding::new(name, value));
        }
    }

    fn frame(&self, depth: usize) -> Option<&ShadowFrame> {
        let index = self.frames.len().checked_sub(depth + 1)?;
        self.frames.get(index)
    }

    /// A fault raised at the innermost frame's current line
    fn fault(&self, description: &str) -> Fault {
        let line = self.frame(0).and_then(|f| f.line).unwrap_or(0);
        let message = format!("{}:{}: {}", file!(), line, description);
        Fault::with_context(message, Box::new(self.clone()))
    }
}

impl Introspect for ShadowStack {
    fn frame_info(&self, depth: usize) -> Option<FrameInfo> {
        self.frame(depth).map(|frame| FrameInfo {
            source: frame.source.clone(),
            current_line: frame.line,
            line_defined: frame.line_defined,
            name: Some(frame.function.to_string()),
        })
    }

    fn locals(&self, depth: usize) -> Vec<Binding> {
        self.frame(depth)
            .map(|f| f.locals.clone())
            .unwrap_or_default()
    }

    fn upvalues(&self, depth: usize) -> Vec<Binding> {
        self.frame(depth)
            .map(|f| f.upvalues.clone())
            .unwrap_or_default()
    }

    fn traceback(&self, message: &str) -> String {
        let mut trace = format!("{}\nstack traceback:", message);
        for frame in self.frames.iter().rev() {
            match (&frame.source, frame.line) {
                (Some(source), Some(line)) => trace.push_str(&format!(
                    "\n\t{}:{}: in function '{}'",
                    source.path().unwrap_or("?"),
                    line,
                    frame.function
                )),
                _ => trace.push_str(&format!("\n\t[native]: in {}", frame.function)),
            }
        }
        trace
    }
}
