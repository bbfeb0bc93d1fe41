use crate::cache::CachedIndexer;
use crate::config::Config;
use crate::context::ContextService;
use crate::fetch;
use crate::indexer::{CodeIndex, SourceIndexer, scan};
use crate::rules::{InMemoryRuleProvider, RuleProvider};
use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Instant;
use tracing::{error, warn};

#[derive(Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct RpcResponse {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
}

#[derive(Serialize)]
struct RpcError {
    message: String,
}

#[derive(Deserialize)]
struct CompileContextParams {
    #[serde(default, alias = "solution_path")]
    path: Option<String>,
    #[serde(default)]
    targets: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct IndexParams {
    path: String,
}

#[derive(Deserialize)]
struct FetchCodeParams {
    path: String,
    #[serde(default = "default_start_line")]
    start_line: i64,
    #[serde(default = "default_end_line")]
    end_line: i64,
}

fn default_start_line() -> i64 {
    1
}

fn default_end_line() -> i64 {
    i64::MAX
}

const METHODS: &[(&str, &str)] = &[
    ("compile_context", "Compile rules and selected nodes into the context DSL"),
    ("index", "List every node found under a path"),
    ("list_rules", "List the architectural rules"),
    ("fetch_code", "Read a line range from a file under the authorized root"),
    ("clear_cache", "Drop all cached index results"),
    ("list_methods", "List available methods"),
];

/// Shared state behind every request.
pub struct App {
    config: Config,
    cache: Arc<CachedIndexer<SourceIndexer>>,
    context: ContextService,
}

impl App {
    pub fn new(config: Config) -> Self {
        let indexer = SourceIndexer::new(scan::ScanOptions::new(config.respect_ignore));
        let cache = Arc::new(CachedIndexer::new(indexer, config.cache_ttl()));
        let rules: Arc<dyn RuleProvider> = Arc::new(InMemoryRuleProvider::new());
        let context = ContextService::new(cache.clone(), rules)
            .with_default_node_cap(config.default_node_cap);
        Self {
            config,
            cache,
            context,
        }
    }

    pub fn context(&self) -> &ContextService {
        &self.context
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn handle_request(&self, req: RpcRequest) -> RpcResponse {
        let id = req.id.clone();
        match self.handle_method(&req.method, req.params) {
            Ok(value) => RpcResponse {
                id,
                result: Some(value),
                error: None,
            },
            Err(err) => error_response(id, &err.to_string()),
        }
    }

    pub fn handle_method(&self, method: &str, params: Value) -> Result<Value> {
        let start = Instant::now();
        let value = match method {
            "list_methods" => json!(
                METHODS
                    .iter()
                    .map(|(name, about)| json!({ "name": name, "description": about }))
                    .collect::<Vec<_>>()
            ),
            "compile_context" => {
                let params: CompileContextParams = from_params(params)?;
                let path = match params.path.as_deref().map(str::trim) {
                    Some(path) if !path.is_empty() => PathBuf::from(path),
                    _ => bail!("path is required"),
                };
                let targets = params.targets.unwrap_or_default();
                json!(self.context.compile(&path, &targets))
            }
            "index" => {
                let params: IndexParams = from_params(params)?;
                let nodes = self.cache.index(Path::new(&params.path));
                json!({ "count": nodes.len(), "nodes": nodes.as_slice() })
            }
            "list_rules" => json!(self.context.rules().get_all()),
            "fetch_code" => {
                let params: FetchCodeParams = from_params(params)?;
                let result = fetch::fetch_code(
                    &self.config.fetch_root(),
                    &params.path,
                    params.start_line,
                    params.end_line,
                )?;
                json!(result)
            }
            "clear_cache" => {
                let cleared = self.cache.len();
                self.cache.clear();
                json!({ "cleared": cleared })
            }
            other => return Err(anyhow!("unknown method: {other}")),
        };

        let elapsed = start.elapsed();
        if elapsed.as_millis() > u128::from(self.config.slow_request_ms) {
            warn!("slow request: {method} took {elapsed:?}");
        }
        Ok(value)
    }
}

fn from_params<T: serde::de::DeserializeOwned>(params: Value) -> Result<T> {
    let params = if params.is_null() { json!({}) } else { params };
    serde_json::from_value(params).context("invalid params")
}

/// Serve JSONL requests from stdin on a fixed pool of worker threads, so a
/// slow index does not hold up other callers.
pub fn serve(config: Config) -> Result<()> {
    let workers = config.rpc_workers;
    let app = App::new(config);
    let stdin = io::stdin();
    serve_lines(&app, stdin.lock(), io::stdout(), workers)
}

/// Read requests line by line from `reader` and answer each on `writer`.
/// At most `workers` requests run at once; responses are written as they
/// complete, so callers match them by `id`.
pub fn serve_lines<R, W>(app: &App, reader: R, writer: W, workers: usize) -> Result<()>
where
    R: BufRead,
    W: Write + Send,
{
    let workers = workers.max(1);
    let writer = Mutex::new(writer);
    let (tx, rx) = mpsc::sync_channel::<String>(workers * 2);
    let rx = Mutex::new(rx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let rx = &rx;
            let writer = &writer;
            scope.spawn(move || {
                loop {
                    let next = match rx.lock() {
                        Ok(guard) => guard.recv(),
                        Err(_) => break,
                    };
                    let Ok(line) = next else {
                        break;
                    };
                    let response = handle_line(app, &line);
                    if let Err(err) = write_response(writer, &response) {
                        error!("write error: {err}");
                    }
                }
            });
        }

        for line in reader.lines() {
            let line = match line {
                Ok(value) => value,
                Err(err) => {
                    error!("stdin error: {err}");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(line).is_err() {
                break;
            }
        }
        drop(tx);
    });

    Ok(())
}

fn handle_line(app: &App, line: &str) -> RpcResponse {
    match serde_json::from_str::<RpcRequest>(line) {
        Ok(request) => app.handle_request(request),
        Err(err) => error_response(Value::Null, &format!("invalid request: {err}")),
    }
}

fn write_response<W: Write>(writer: &Mutex<W>, response: &RpcResponse) -> Result<()> {
    let line = serde_json::to_string(response)?;
    let mut out = writer
        .lock()
        .map_err(|_| anyhow!("writer lock poisoned"))?;
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

/// Run a single request and return the serialized response line.
pub fn call(config: Config, method: String, params_raw: &str, id_raw: &str) -> Result<String> {
    let params: Value = serde_json::from_str(params_raw).with_context(|| "parse params JSON")?;
    let id = parse_value(id_raw);
    let app = App::new(config);
    let request = RpcRequest { id, method, params };
    let response = app.handle_request(request);
    Ok(serde_json::to_string(&response)?)
}

fn error_response(id: Value, message: &str) -> RpcResponse {
    RpcResponse {
        id,
        result: None,
        error: Some(RpcError {
            message: message.to_string(),
        }),
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
