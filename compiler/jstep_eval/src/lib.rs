//! Step-through evaluator for the jstep JavaScript subset.
//!
//! The crate is layered bottom-up:
//!
//! - [`value`]: runtime values with shared, copy-on-write storage
//! - [`scope`]: the single global binding table and change diffing
//! - [`eval`]: expression evaluation, places and builtins
//! - [`exec`]: one-unit statement execution over a control-frame stack
//! - [`Session`]: the debugger command surface and step history
//!
//! ```
//! use jstep_eval::{Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//! session.initialize_code("let x = 5;\nlet y = x + 3;\nconsole.log(y);");
//! session.run_to_end();
//!
//! let state = session.state();
//! assert!(state.is_complete);
//! assert_eq!(state.output, vec!["8".to_string()]);
//! ```

mod errors;
pub mod eval;
pub mod exec;
pub mod scope;
mod session;
pub mod value;

pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use scope::{Scope, Variable};
pub use session::{
    ErrorInfo, ExecutionState, Session, SessionConfig, UnsupportedPolicy, DEFAULT_MAX_STEPS,
    GLOBAL_FRAME,
};
pub use value::{Value, ValueType};
