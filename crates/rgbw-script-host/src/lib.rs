//! Embedded Lua session: load a script, publish the shader state, call the
//! entry point and read back whatever table it returns.
use std::{fs, path::PathBuf};

use mlua::{Function, Lua, LuaOptions, LuaSerdeExt, StdLib, Value};
use rgbw_core::{GuestValue, HostOptions, ResultEntry, ShaderState};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("failed to create interpreter: {0}")]
    Open(String),
    #[error("cannot open {}: {}", .path.display(), strerror(.source))]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{0}")]
    Load(String),
    #[error("global '{0}' already published")]
    AlreadyPublished(String),
    #[error("{0}")]
    Invoke(String),
    #[error("{0}")]
    Marshal(String),
}

pub type Result<T> = std::result::Result<T, HostError>;

/// The single value returned by the entry point.
#[derive(Debug, Clone)]
pub struct ReturnValue(Value);

impl ReturnValue {
    /// Stand-in result after a failed invocation.
    pub fn nil() -> Self {
        Self(Value::Nil)
    }

    pub fn guest(&self) -> GuestValue {
        to_guest(&self.0)
    }
}

pub struct ScriptSession {
    lua: Lua,
    options: HostOptions,
    published: bool,
}

impl ScriptSession {
    /// Fresh interpreter with the standard libraries and the `print_host` hook.
    pub fn open(options: HostOptions) -> Result<Self> {
        let lua = Lua::new_with(StdLib::ALL_SAFE, LuaOptions::default())
            .map_err(|e| HostError::Open(lua_message(&e)))?;

        let print_host = lua
            .create_function(|_, msg: String| {
                info!(target: "guest", "{msg}");
                Ok(())
            })
            .map_err(|e| HostError::Open(lua_message(&e)))?;
        lua.globals()
            .set("print_host", print_host)
            .map_err(|e| HostError::Open(lua_message(&e)))?;

        debug!(script = %options.script_path.display(), "session open");
        Ok(Self { lua, options, published: false })
    }

    /// Read and run the configured script file at top level.
    pub fn load_script(&self) -> Result<()> {
        let path = &self.options.script_path;
        let mut src = fs::read(path).map_err(|source| HostError::Read {
            path: path.clone(),
            source,
        })?;
        skip_shebang(&mut src);

        self.lua
            .load(&src[..])
            .set_name(format!("@{}", path.display()))
            .exec()
            .map_err(|e| HostError::Load(lua_message(&e)))?;
        debug!(script = %path.display(), bytes = src.len(), "script loaded");
        Ok(())
    }

    /// Bind `state` under the configured global name. Only once per session.
    pub fn publish_state(&mut self, state: &ShaderState) -> Result<()> {
        let name = &self.options.global_name;
        if self.published {
            return Err(HostError::AlreadyPublished(name.clone()));
        }

        let table = match self.lua.to_value(state) {
            Ok(Value::Table(t)) => t,
            Ok(other) => {
                return Err(HostError::Marshal(format!(
                    "shader state serialized to {}, expected table",
                    other.type_name()
                )))
            }
            Err(e) => return Err(HostError::Marshal(lua_message(&e))),
        };
        self.lua
            .globals()
            .set(name.as_str(), table)
            .map_err(|e| HostError::Marshal(lua_message(&e)))?;

        debug!(global = %name, fields = ?state.fields(), "state published");
        self.published = true;
        Ok(())
    }

    /// Call the entry point with no arguments; it reads the published global.
    pub fn invoke(&self) -> Result<ReturnValue> {
        let name = &self.options.entry_point;
        let entry: Value = self
            .lua
            .globals()
            .get(name.as_str())
            .map_err(|e| HostError::Invoke(lua_message(&e)))?;

        let func: Function = match entry {
            Value::Function(f) => f,
            other => {
                let msg = format!("attempt to call a {} value", to_guest(&other).type_name());
                warn!(entry = %name, "{msg}");
                return Err(HostError::Invoke(msg));
            }
        };

        match func.call::<Value>(()) {
            Ok(v) => {
                debug!(
                    entry = %name,
                    returned = to_guest(&v).type_name(),
                    "entry point returned"
                );
                Ok(ReturnValue(v))
            }
            Err(e) => {
                let msg = lua_message(&e);
                warn!(entry = %name, "{msg}");
                Err(HostError::Invoke(msg))
            }
        }
    }

    /// Enumerate the returned table in the interpreter's `next` order.
    ///
    /// Anything other than a table has no entries.
    pub fn read_result(&self, returned: ReturnValue) -> Result<Vec<ResultEntry>> {
        let table = match returned.0 {
            Value::Table(t) => t,
            other => {
                debug!(returned = to_guest(&other).type_name(), "result is not a table");
                return Ok(Vec::new());
            }
        };

        let mut out = Vec::new();
        for pair in table.pairs::<Value, Value>() {
            let (k, v) = pair.map_err(|e| HostError::Marshal(lua_message(&e)))?;
            let (key, value) = (to_guest(&k), to_guest(&v));
            let number = self
                .lua
                .coerce_number(v)
                .map_err(|e| HostError::Marshal(lua_message(&e)))?;
            out.push(ResultEntry { key, value, number });
        }
        debug!(entries = out.len(), "result read");
        Ok(out)
    }

    /// Release the interpreter.
    pub fn close(self) {
        debug!("session closed");
        drop(self.lua);
    }
}

fn to_guest(v: &Value) -> GuestValue {
    match v {
        Value::Nil => GuestValue::Nil,
        Value::Boolean(b) => GuestValue::Boolean(*b),
        Value::Integer(i) => GuestValue::Integer(*i),
        Value::Number(n) => GuestValue::Number(*n),
        Value::String(s) => GuestValue::String(s.to_string_lossy().into()),
        Value::Table(_) => GuestValue::Table,
        Value::Function(_) => GuestValue::Function,
        Value::Thread(_) => GuestValue::Thread,
        Value::UserData(_) | Value::LightUserData(_) | Value::Error(_) => GuestValue::UserData,
        _ => GuestValue::Other,
    }
}

/// `io::Error` text without the ` (os error N)` suffix, as C's `strerror` gives it.
fn strerror(err: &std::io::Error) -> String {
    let msg = err.to_string();
    match msg.rfind(" (os error ") {
        Some(i) => msg[..i].to_string(),
        None => msg,
    }
}

/// The interpreter's own message text, without mlua's prefixes or traceback.
fn lua_message(err: &mlua::Error) -> String {
    let msg = match err {
        mlua::Error::SyntaxError { message, .. } => message.clone(),
        mlua::Error::RuntimeError(m) => m.clone(),
        mlua::Error::CallbackError { cause, .. } => return lua_message(cause),
        other => other.to_string(),
    };
    match msg.split_once("\nstack traceback:") {
        Some((head, _)) => head.to_string(),
        None => msg,
    }
}

// Lua's file loader ignores a leading `#` line; keep the newline so line
// numbers in error messages stay right.
fn skip_shebang(src: &mut Vec<u8>) {
    if src.first() == Some(&b'#') {
        let end = src.iter().position(|&b| b == b'\n').unwrap_or(src.len());
        src.drain(..end);
    }
}
