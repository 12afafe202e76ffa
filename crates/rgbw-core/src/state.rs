use serde::Serialize;

/// Record published to the guest before the entry point runs.
///
/// Built once per run and never mutated afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShaderState {
    pub t: f64,
    pub h: f64,
    pub v: f64,
    pub h_res: f64,
    pub v_res: f64,
}

impl ShaderState {
    /// Field names in declaration order (also the serialized keys).
    pub const FIELDS: [&'static str; 5] = ["t", "h", "v", "h_res", "v_res"];

    pub fn fields(&self) -> [(&'static str, f64); 5] {
        [
            ("t", self.t),
            ("h", self.h),
            ("v", self.v),
            ("h_res", self.h_res),
            ("v_res", self.v_res),
        ]
    }
}

impl Default for ShaderState {
    fn default() -> Self {
        Self {
            t: 23.42,
            h: 1.0,
            v: 3.0,
            h_res: 1.0,
            v_res: 13.0,
        }
    }
}
