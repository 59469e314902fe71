//! Operand values and the constraints an instruction places on them.
//!
//! A [`Value`] is what the assembler knows about an operand before it
//! has chosen an encoding: a register, a register pair, one of the
//! index-register addressing modes, a number or a symbol name which
//! has not been resolved yet.  An [`OperandSpec`] describes one
//! operand slot of an instruction variant; [`OperandSpec::fit`]
//! decides whether a (resolved) value is acceptable in that slot and
//! computes the integer which gets packed into the instruction word.

use std::fmt::{self, Display, Formatter};

/// The three index registers X (r27:r26), Y (r29:r28) and Z (r31:r30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PointerRegister {
    X,
    Y,
    Z,
}

impl Display for PointerRegister {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PointerRegister::X => "X",
            PointerRegister::Y => "Y",
            PointerRegister::Z => "Z",
        })
    }
}

/// How an index register is used by a load or store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessMode {
    /// `X`
    Direct,
    /// `X+`
    PostIncrement,
    /// `-X`
    PreDecrement,
    /// `Y+q`; only Y and Z support a displacement.
    Displaced,
}

/// The largest displacement allowed in `Y+q` and `Z+q`.
pub const MAX_DISPLACEMENT: u8 = 63;

/// An operand value, as written in the source or as found in the
/// symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// The operand is absent.
    #[default]
    None,
    /// `rN`, 0 <= N <= 31.
    Register(u8),
    /// `rH:rL`, identified by the (even) number of its low register.
    RegisterPair(u8),
    /// An index register in one of its addressing modes.  The
    /// displacement is zero except in [`AccessMode::Displaced`].
    Pointer {
        register: PointerRegister,
        mode: AccessMode,
        displacement: u8,
    },
    Number(i64),
    /// A symbol which has not been looked up yet.
    Identifier(String),
}

impl Value {
    #[must_use]
    pub fn pointer(register: PointerRegister, mode: AccessMode) -> Value {
        Value::Pointer {
            register,
            mode,
            displacement: 0,
        }
    }

    #[must_use]
    pub fn displaced(register: PointerRegister, displacement: u8) -> Value {
        Value::Pointer {
            register,
            mode: AccessMode::Displaced,
            displacement,
        }
    }

    /// The category of this value, or `None` for an unresolved
    /// identifier (which has no category until it is looked up).
    #[must_use]
    pub fn kind(&self) -> Option<Kind> {
        match self {
            Value::None => Some(Kind::None),
            Value::Register(_) => Some(Kind::Register),
            Value::RegisterPair(_) => Some(Kind::RegisterPair),
            Value::Pointer { register, mode, .. } => Some(Kind::Pointer(*register, *mode)),
            Value::Number(_) => Some(Kind::Number),
            Value::Identifier(_) => None,
        }
    }

    /// The integer carried by this value.  Values with no payload
    /// (absent operands, undisplaced pointers) yield zero.
    fn payload(&self) -> Option<i64> {
        match self {
            Value::None => Some(0),
            Value::Register(n) | Value::RegisterPair(n) => Some(i64::from(*n)),
            Value::Pointer { displacement, .. } => Some(i64::from(*displacement)),
            Value::Number(n) => Some(*n),
            Value::Identifier(_) => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("(none)"),
            Value::Register(n) => write!(f, "r{n}"),
            Value::RegisterPair(n) => write!(f, "r{}:r{n}", n + 1),
            Value::Pointer {
                register,
                mode,
                displacement,
            } => match mode {
                AccessMode::Direct => write!(f, "{register}"),
                AccessMode::PostIncrement => write!(f, "{register}+"),
                AccessMode::PreDecrement => write!(f, "-{register}"),
                AccessMode::Displaced => write!(f, "{register}+{displacement}"),
            },
            Value::Number(n) => write!(f, "{n}"),
            Value::Identifier(name) => f.write_str(name),
        }
    }
}

/// The category of a [`Value`].  An operand slot accepts exactly one
/// category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    None,
    Register,
    RegisterPair,
    Pointer(PointerRegister, AccessMode),
    Number,
}

impl Kind {
    /// Does a value of this kind carry bits which must be packed into
    /// the instruction?
    #[must_use]
    pub fn has_payload(&self) -> bool {
        match self {
            Kind::None => false,
            Kind::Pointer(_, mode) => *mode == AccessMode::Displaced,
            Kind::Register | Kind::RegisterPair | Kind::Number => true,
        }
    }
}

/// A transformation applied to an operand after it has passed the
/// range check and before it is packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Subtract a fixed amount (e.g. r16..r31 are encoded as 0..15).
    Bias(i64),
    /// Invert the low 8 bits (`cbr` is `andi` with the complement).
    Invert,
    /// Reduce modulo 2^16.
    Wrap16,
    /// Turn the low register of a pair into a compact pair index:
    /// `(n - base) / 2`.
    Pair { base: i64 },
}

impl Transform {
    #[must_use]
    pub fn apply(&self, value: i64) -> i64 {
        match self {
            Transform::Bias(bias) => value - bias,
            Transform::Invert => 0xFF ^ (value & 0xFF),
            Transform::Wrap16 => value.rem_euclid(0x1_0000),
            Transform::Pair { base } => (value - base) >> 1,
        }
    }
}

/// One operand slot of an instruction variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandSpec {
    pub kind: Kind,
    /// Inclusive bounds, checked after the relative adjustment and
    /// before the transform.
    pub bounds: Option<(i64, i64)>,
    pub transform: Option<Transform>,
    /// When set, the operand is a target address and is encoded as
    /// its distance from the address following the instruction.
    pub relative: bool,
}

impl OperandSpec {
    /// A slot which requires the operand to be absent.
    pub const NONE: OperandSpec = OperandSpec::of(Kind::None);

    #[must_use]
    pub const fn of(kind: Kind) -> OperandSpec {
        OperandSpec {
            kind,
            bounds: None,
            transform: None,
            relative: false,
        }
    }

    #[must_use]
    pub const fn within(self, low: i64, high: i64) -> OperandSpec {
        OperandSpec {
            bounds: Some((low, high)),
            ..self
        }
    }

    #[must_use]
    pub const fn then(self, transform: Transform) -> OperandSpec {
        OperandSpec {
            transform: Some(transform),
            ..self
        }
    }

    #[must_use]
    pub const fn relative(self) -> OperandSpec {
        OperandSpec {
            relative: true,
            ..self
        }
    }

    /// Compute the integer to be packed for `value`, or `None` if
    /// this slot does not accept it.  `next_address` is the (word)
    /// address immediately after the instruction being encoded.
    ///
    /// A value of the wrong kind and a value which is out of range
    /// are both simply not accepted; callers try the other variants
    /// of the mnemonic.
    #[must_use]
    pub fn fit(&self, value: &Value, next_address: i64) -> Option<i64> {
        if value.kind()? != self.kind {
            return None;
        }
        let mut n = value.payload()?;
        if self.relative {
            n = n.checked_sub(next_address)?;
        }
        if let Some((low, high)) = self.bounds {
            if n < low || n > high {
                return None;
            }
        }
        Some(match self.transform {
            Some(t) => t.apply(n),
            None => n,
        })
    }
}
