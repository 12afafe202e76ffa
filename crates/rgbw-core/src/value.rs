//! Guest values as seen from the host.
//!
//! The interpreter's dynamic types are folded into [`GuestValue`] at the
//! boundary so that type names are plain matches. Numeric coercion stays with
//! the interpreter; the host only renders its result.

/// Runtime type of a guest value, named the way Lua names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestKind {
    Nil,
    Boolean,
    Number,
    String,
    Table,
    Function,
    UserData,
    Thread,
    Other,
}

impl GuestKind {
    pub fn name(&self) -> &'static str {
        match self {
            GuestKind::Nil => "nil",
            GuestKind::Boolean => "boolean",
            GuestKind::Number => "number",
            GuestKind::String => "string",
            GuestKind::Table => "table",
            GuestKind::Function => "function",
            GuestKind::UserData => "userdata",
            GuestKind::Thread => "thread",
            GuestKind::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuestValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Number(f64),
    String(String),
    Table,
    Function,
    UserData,
    Thread,
    Other,
}

impl GuestValue {
    pub fn kind(&self) -> GuestKind {
        match self {
            GuestValue::Nil => GuestKind::Nil,
            GuestValue::Boolean(_) => GuestKind::Boolean,
            GuestValue::Integer(_) | GuestValue::Number(_) => GuestKind::Number,
            GuestValue::String(_) => GuestKind::String,
            GuestValue::Table => GuestKind::Table,
            GuestValue::Function => GuestKind::Function,
            GuestValue::UserData => GuestKind::UserData,
            GuestValue::Thread => GuestKind::Thread,
            GuestValue::Other => GuestKind::Other,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Two-decimal rendering of a coerced number; `0.00` when there is none.
pub fn format_rgbw(number: Option<f64>) -> String {
    let n = number.unwrap_or(0.0);
    if n.is_nan() {
        return "nan".to_string();
    }
    format!("{n:.2}")
}
