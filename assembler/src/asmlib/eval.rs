//! Turning an operand, as written, into a [`Value`].
//!
//! An operand is a single token: a register (`r16`), a register pair
//! (`r25:r24`), an index register in one of its addressing modes (`X`,
//! `X+`, `-X`, `Y+12`), a number (`42`, `-3`, `0x3F`, `0b1010`) or the
//! name of a symbol.  Registers and index registers may be written in
//! either case.  Symbol names are looked up later, by the linker.
use logos::{Lexer, Logos};

use base::prelude::{AccessMode, PointerRegister, Value, MAX_DISPLACEMENT};

use super::source::Location;
use super::types::AssemblerFailure;

fn pointer_register(ch: char) -> Option<PointerRegister> {
    match ch.to_ascii_uppercase() {
        'X' => Some(PointerRegister::X),
        'Y' => Some(PointerRegister::Y),
        'Z' => Some(PointerRegister::Z),
        _ => None,
    }
}

/// `text` is `rN` (or `RN`).
fn register_number(text: &str) -> Option<u8> {
    let n: u8 = text.get(1..)?.parse().ok()?;
    (n <= 31).then_some(n)
}

fn capture_register(lex: &mut Lexer<OperandToken>) -> Option<u8> {
    register_number(lex.slice())
}

/// Returns the number of the low register of the pair.
fn capture_pair(lex: &mut Lexer<OperandToken>) -> Option<u8> {
    let (high, low) = lex.slice().split_once(':')?;
    let (high, low) = (register_number(high)?, register_number(low)?);
    (low % 2 == 0 && high == low + 1).then_some(low)
}

fn capture_leading_pointer(lex: &mut Lexer<OperandToken>) -> Option<PointerRegister> {
    lex.slice().chars().next().and_then(pointer_register)
}

fn capture_trailing_pointer(lex: &mut Lexer<OperandToken>) -> Option<PointerRegister> {
    lex.slice().chars().last().and_then(pointer_register)
}

fn capture_displaced(lex: &mut Lexer<OperandToken>) -> Option<(PointerRegister, u8)> {
    let (register, displacement) = lex.slice().split_once('+')?;
    let register = pointer_register(register.chars().next()?)?;
    let displacement: u8 = displacement.parse().ok()?;
    (displacement <= MAX_DISPLACEMENT).then_some((register, displacement))
}

/// Parse an optionally negative number.  `prefix` is the length of
/// the radix prefix (`0x`, `0b`) which follows the sign, if any.
fn parse_signed(text: &str, prefix: usize, radix: u32) -> Option<i64> {
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let digits = unsigned.get(prefix..)?;
    if negative {
        // Parse with the sign attached so that i64::MIN is accepted.
        i64::from_str_radix(&format!("-{digits}"), radix).ok()
    } else {
        i64::from_str_radix(digits, radix).ok()
    }
}

fn capture_decimal(lex: &mut Lexer<OperandToken>) -> Option<i64> {
    parse_signed(lex.slice(), 0, 10)
}

fn capture_hex(lex: &mut Lexer<OperandToken>) -> Option<i64> {
    parse_signed(lex.slice(), 2, 16)
}

fn capture_binary(lex: &mut Lexer<OperandToken>) -> Option<i64> {
    parse_signed(lex.slice(), 2, 2)
}

#[derive(Debug, PartialEq, Eq, Logos, Clone)]
enum OperandToken {
    #[regex("[rR][0-9]+", capture_register, priority = 10)]
    Register(u8),

    #[regex("[rR][0-9]+:[rR][0-9]+", capture_pair, priority = 10)]
    RegisterPair(u8),

    #[regex("[xXyYzZ]", capture_leading_pointer, priority = 10)]
    Direct(PointerRegister),

    #[regex(r"[xXyYzZ]\+", capture_leading_pointer, priority = 10)]
    PostIncrement(PointerRegister),

    #[regex("-[xXyYzZ]", capture_trailing_pointer, priority = 10)]
    PreDecrement(PointerRegister),

    // Only Y and Z support a displacement.
    #[regex(r"[yYzZ]\+[0-9]+", capture_displaced, priority = 10)]
    Displaced((PointerRegister, u8)),

    #[regex("-?[0-9]+", capture_decimal, priority = 10)]
    #[regex("-?0[xX][0-9a-fA-F]+", capture_hex, priority = 10)]
    #[regex("-?0[bB][01]+", capture_binary, priority = 10)]
    Number(i64),

    #[regex("[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Identifier(String),
}

impl From<OperandToken> for Value {
    fn from(token: OperandToken) -> Value {
        match token {
            OperandToken::Register(n) => Value::Register(n),
            OperandToken::RegisterPair(low) => Value::RegisterPair(low),
            OperandToken::Direct(register) => Value::pointer(register, AccessMode::Direct),
            OperandToken::PostIncrement(register) => {
                Value::pointer(register, AccessMode::PostIncrement)
            }
            OperandToken::PreDecrement(register) => {
                Value::pointer(register, AccessMode::PreDecrement)
            }
            OperandToken::Displaced((register, displacement)) => {
                Value::displaced(register, displacement)
            }
            OperandToken::Number(n) => Value::Number(n),
            OperandToken::Identifier(name) => Value::Identifier(name),
        }
    }
}

/// Evaluate one operand.  The whole of `token` must form a single
/// operand.
pub(crate) fn evaluate(token: &str, location: &Location) -> Result<Value, AssemblerFailure> {
    let bad = || AssemblerFailure::BadExpression {
        location: location.clone(),
        token: token.to_string(),
    };
    let mut lexer = OperandToken::lexer(token);
    let value = match lexer.next() {
        Some(Ok(t)) => Value::from(t),
        Some(Err(())) | None => {
            return Err(bad());
        }
    };
    if lexer.next().is_some() {
        return Err(bad());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use test_strategy::proptest;

    use super::*;
    use PointerRegister::{X, Y, Z};

    fn here() -> Location {
        let name: Arc<str> = Arc::from("test");
        Location::new(&name, 1)
    }

    fn eval(token: &str) -> Value {
        match evaluate(token, &here()) {
            Ok(v) => v,
            Err(e) => {
                panic!("failed to evaluate '{token}': {e}");
            }
        }
    }

    fn eval_fails(token: &str) {
        match evaluate(token, &here()) {
            Err(AssemblerFailure::BadExpression { token: t, .. }) => {
                assert_eq!(t, token);
            }
            other => {
                panic!("expected '{token}' to be a bad expression, got {other:?}");
            }
        }
    }

    #[test]
    fn registers() {
        assert_eq!(eval("r0"), Value::Register(0));
        assert_eq!(eval("r31"), Value::Register(31));
        assert_eq!(eval("R16"), Value::Register(16));
        eval_fails("r32");
        eval_fails("r-1");
    }

    #[test]
    fn register_pairs() {
        assert_eq!(eval("r25:r24"), Value::RegisterPair(24));
        assert_eq!(eval("r1:r0"), Value::RegisterPair(0));
        assert_eq!(eval("R31:R30"), Value::RegisterPair(30));
        // The low register must be even and the high one must follow it.
        eval_fails("r24:r23");
        eval_fails("r26:r24");
        eval_fails("r24:r25");
        eval_fails("r32:r31");
    }

    #[test]
    fn index_registers() {
        assert_eq!(eval("X"), Value::pointer(X, AccessMode::Direct));
        assert_eq!(eval("y"), Value::pointer(Y, AccessMode::Direct));
        assert_eq!(eval("Z+"), Value::pointer(Z, AccessMode::PostIncrement));
        assert_eq!(eval("-X"), Value::pointer(X, AccessMode::PreDecrement));
        assert_eq!(eval("Y+0"), Value::displaced(Y, 0));
        assert_eq!(eval("z+63"), Value::displaced(Z, 63));
        eval_fails("Z+64");
        // X has no displaced form.
        eval_fails("X+1");
        eval_fails("X-");
    }

    #[test]
    fn numbers() {
        assert_eq!(eval("0"), Value::Number(0));
        assert_eq!(eval("42"), Value::Number(42));
        assert_eq!(eval("-7"), Value::Number(-7));
        assert_eq!(eval("0x3F"), Value::Number(0x3F));
        assert_eq!(eval("0XfF"), Value::Number(0xFF));
        assert_eq!(eval("-0x10"), Value::Number(-16));
        assert_eq!(eval("0b1010"), Value::Number(10));
        eval_fails("0x");
        eval_fails("0b2");
        eval_fails("99999999999999999999");
    }

    #[test]
    fn identifiers() {
        assert_eq!(eval("loop"), Value::Identifier("loop".to_string()));
        assert_eq!(eval("__vectors"), Value::Identifier("__vectors".to_string()));
        // Longer than a register, so it is a name.
        assert_eq!(eval("r16a"), Value::Identifier("r16a".to_string()));
        assert_eq!(eval("Xval"), Value::Identifier("Xval".to_string()));
    }

    #[test]
    fn whole_token_must_be_consumed() {
        eval_fails("");
        eval_fails("r16 r17");
        eval_fails("foo+1");
        eval_fails("12abc");
        eval_fails("$10");
    }

    #[proptest]
    fn decimal_numbers_evaluate_to_themselves(n: i64) {
        assert_eq!(eval(&n.to_string()), Value::Number(n));
    }

    #[proptest]
    fn hex_numbers_evaluate_to_themselves(n: u32) {
        assert_eq!(eval(&format!("0x{n:x}")), Value::Number(i64::from(n)));
    }
}
