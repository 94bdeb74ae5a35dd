//! Native stack growth for jstep's recursive descent.
//!
//! Two places in jstep recurse once per level of source nesting: the
//! expression parser (`parse_expr`, plus the right operand of `**` and the
//! operand of a prefix operator) and `Evaluator::eval`. Both wrap that entry
//! point in [`ensure_sufficient_stack`], so `((((x))))` a few hundred
//! thousand levels deep, or a long `a + b + c + ...` chain, grows the stack
//! instead of aborting the debugger.
//!
//! On wasm32 the guard is a plain call.

/// Headroom that must remain before entering a guarded frame.
///
/// Between two guarded calls the parser walks the whole precedence ladder
/// (conditional, `||`, `&&`, equality, relational, additive,
/// multiplicative, exponent, unary, postfix, primary), so the gap is a
/// dozen frames rather than one.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first moving to a new stack segment if less than the red zone
/// remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
