//! JVM operation codes understood by the instruction model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Error;

macro_rules! opcodes {
    ($($variant:ident = $code:literal => $mnemonic:literal,)+) => {
        /// Operation code of a bytecode instruction.
        ///
        /// Covers the subset of the JVM instruction set that shows up around
        /// method returns. Serialized as the upper-case mnemonic.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub enum Opcode {
            $($variant,)+
        }

        impl Opcode {
            /// Every opcode, in numeric order.
            pub const ALL: &'static [Opcode] = &[$(Opcode::$variant,)+];

            /// Numeric JVM opcode.
            pub fn code(self) -> u8 {
                match self {
                    $(Opcode::$variant => $code,)+
                }
            }

            /// Upper-case mnemonic, e.g. `ICONST_0`.
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$variant => $mnemonic,)+
                }
            }
        }
    };
}

opcodes! {
    Nop = 0 => "NOP",
    AconstNull = 1 => "ACONST_NULL",
    IconstM1 = 2 => "ICONST_M1",
    Iconst0 = 3 => "ICONST_0",
    Iconst1 = 4 => "ICONST_1",
    Iconst2 = 5 => "ICONST_2",
    Iconst3 = 6 => "ICONST_3",
    Iconst4 = 7 => "ICONST_4",
    Iconst5 = 8 => "ICONST_5",
    Lconst0 = 9 => "LCONST_0",
    Lconst1 = 10 => "LCONST_1",
    Fconst0 = 11 => "FCONST_0",
    Fconst1 = 12 => "FCONST_1",
    Fconst2 = 13 => "FCONST_2",
    Dconst0 = 14 => "DCONST_0",
    Dconst1 = 15 => "DCONST_1",
    Bipush = 16 => "BIPUSH",
    Sipush = 17 => "SIPUSH",
    Ldc = 18 => "LDC",
    Iload = 21 => "ILOAD",
    Lload = 22 => "LLOAD",
    Fload = 23 => "FLOAD",
    Dload = 24 => "DLOAD",
    Aload = 25 => "ALOAD",
    Istore = 54 => "ISTORE",
    Lstore = 55 => "LSTORE",
    Fstore = 56 => "FSTORE",
    Dstore = 57 => "DSTORE",
    Astore = 58 => "ASTORE",
    Pop = 87 => "POP",
    Dup = 89 => "DUP",
    Iadd = 96 => "IADD",
    Isub = 100 => "ISUB",
    Imul = 104 => "IMUL",
    Ineg = 116 => "INEG",
    Ifeq = 153 => "IFEQ",
    Ifne = 154 => "IFNE",
    IfIcmpeq = 159 => "IF_ICMPEQ",
    IfIcmpne = 160 => "IF_ICMPNE",
    Goto = 167 => "GOTO",
    Ireturn = 172 => "IRETURN",
    Lreturn = 173 => "LRETURN",
    Freturn = 174 => "FRETURN",
    Dreturn = 175 => "DRETURN",
    Areturn = 176 => "ARETURN",
    Return = 177 => "RETURN",
    Getstatic = 178 => "GETSTATIC",
    Putstatic = 179 => "PUTSTATIC",
    Getfield = 180 => "GETFIELD",
    Putfield = 181 => "PUTFIELD",
    Invokevirtual = 182 => "INVOKEVIRTUAL",
    Invokespecial = 183 => "INVOKESPECIAL",
    Invokestatic = 184 => "INVOKESTATIC",
    Invokeinterface = 185 => "INVOKEINTERFACE",
    New = 187 => "NEW",
    Athrow = 191 => "ATHROW",
    Checkcast = 192 => "CHECKCAST",
    Instanceof = 193 => "INSTANCEOF",
    Ifnull = 198 => "IFNULL",
    Ifnonnull = 199 => "IFNONNULL",
}

impl Opcode {
    /// Constant pushes of the zero value for int, long, float and double.
    pub fn is_zero_constant(self) -> bool {
        matches!(
            self,
            Opcode::Iconst0 | Opcode::Lconst0 | Opcode::Fconst0 | Opcode::Dconst0
        )
    }

    /// The four method invocation opcodes.
    pub fn is_invoke(self) -> bool {
        matches!(
            self,
            Opcode::Invokevirtual
                | Opcode::Invokespecial
                | Opcode::Invokestatic
                | Opcode::Invokeinterface
        )
    }

    /// Conditional and unconditional jumps.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Opcode::Ifeq
                | Opcode::Ifne
                | Opcode::IfIcmpeq
                | Opcode::IfIcmpne
                | Opcode::Goto
                | Opcode::Ifnull
                | Opcode::Ifnonnull
        )
    }

    /// Local variable loads and stores.
    pub fn is_var(self) -> bool {
        (Opcode::Iload.code()..=Opcode::Aload.code()).contains(&self.code())
            || (Opcode::Istore.code()..=Opcode::Astore.code()).contains(&self.code())
    }

    /// Field reads and writes.
    pub fn is_field(self) -> bool {
        (Opcode::Getstatic.code()..=Opcode::Putfield.code()).contains(&self.code())
    }

    /// Instructions taking a class operand.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            Opcode::New | Opcode::Checkcast | Opcode::Instanceof
        )
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl FromStr for Opcode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown opcode: {s}")))
    }
}

impl TryFrom<String> for Opcode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Opcode> for String {
    fn from(op: Opcode) -> Self {
        op.mnemonic().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonic_roundtrip() {
        for op in Opcode::ALL {
            assert_eq!(op.mnemonic().parse::<Opcode>().unwrap(), *op);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("iconst_0".parse::<Opcode>().unwrap(), Opcode::Iconst0);
        assert_eq!(" Areturn ".parse::<Opcode>().unwrap(), Opcode::Areturn);
        assert!("ICONST_9".parse::<Opcode>().is_err());
    }

    #[test]
    fn test_numeric_codes() {
        assert_eq!(Opcode::AconstNull.code(), 1);
        assert_eq!(Opcode::Iconst1.code(), 4);
        assert_eq!(Opcode::Ireturn.code(), 172);
    }

    #[test]
    fn test_zero_constants() {
        let zeros: Vec<Opcode> = Opcode::ALL
            .iter()
            .copied()
            .filter(|op| op.is_zero_constant())
            .collect();
        assert_eq!(
            zeros,
            vec![
                Opcode::Iconst0,
                Opcode::Lconst0,
                Opcode::Fconst0,
                Opcode::Dconst0
            ]
        );
        assert!(!Opcode::Iconst1.is_zero_constant());
        assert!(!Opcode::AconstNull.is_zero_constant());
    }

    #[test]
    fn test_categories() {
        assert!(Opcode::Invokeinterface.is_invoke());
        assert!(!Opcode::Getfield.is_invoke());
        assert!(Opcode::Getfield.is_field());
        assert!(Opcode::Astore.is_var());
        assert!(Opcode::Goto.is_jump());
        assert!(Opcode::Checkcast.is_type());
    }

    #[test]
    fn test_serde_uses_mnemonic() {
        assert_eq!(
            serde_json::to_string(&Opcode::IfIcmpne).unwrap(),
            "\"IF_ICMPNE\""
        );
        let op: Opcode = serde_json::from_str("\"lconst_0\"").unwrap();
        assert_eq!(op, Opcode::Lconst0);
        assert!(serde_json::from_str::<Opcode>("\"BOGUS\"").is_err());
    }
}
