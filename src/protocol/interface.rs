use crate::{
    error::{Direction, Error, Result},
    protocol::types::ArgKind,
};

/// Argument signature of one request or event, in libwayland notation.
///
/// Leading digits give the interface version the message appeared in, then
/// one character per argument: `i` int, `u` uint, `s` string, `n` new_id,
/// `o` object, `a` array, `h` fd. A `?` marks the following object nullable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signature(&'static str);

impl Signature {
    pub const fn new(signature: &'static str) -> Self {
        Self(signature)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }

    /// Version that introduced this message, 1 when not annotated.
    pub fn since(&self) -> u32 {
        let digits: String = self.0.chars().take_while(char::is_ascii_digit).collect();
        digits.parse().unwrap_or(1)
    }

    /// The argument slots, in declaration order.
    pub fn arguments(&self) -> Result<Vec<ArgKind>> {
        let mut kinds = Vec::new();
        let mut nullable = false;

        for c in self.0.chars().skip_while(char::is_ascii_digit) {
            let kind = match (c, nullable) {
                ('?', false) => {
                    nullable = true;
                    continue;
                }
                ('o', true) => ArgKind::OptionalObject,
                ('o', false) => ArgKind::Object,
                ('i', false) => ArgKind::Int,
                ('u', false) => ArgKind::Uint,
                ('s', false) => ArgKind::String,
                ('n', false) => ArgKind::NewId,
                ('a', false) => ArgKind::Array,
                ('h', false) => ArgKind::Fd,
                _ => {
                    return Err(Error::codec(format!(
                        "unsupported signature {:?} at {c:?}",
                        self.0
                    )));
                }
            };
            nullable = false;
            kinds.push(kind);
        }

        Ok(kinds)
    }
}

/// Static description of a request or event.
#[derive(Debug)]
pub struct MessageDesc {
    pub name: &'static str,
    pub signature: Signature,
    /// Sending (or receiving) this message ends the object's life.
    pub destructor: bool,
}

impl MessageDesc {
    pub const fn new(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature: Signature::new(signature),
            destructor: false,
        }
    }

    pub const fn destructor(name: &'static str, signature: &'static str) -> Self {
        Self {
            name,
            signature: Signature::new(signature),
            destructor: true,
        }
    }
}

/// Interface descriptor: the method and event tables of one protocol
/// interface, indexed by opcode.
#[derive(Debug)]
pub struct Interface {
    pub name: &'static str,
    pub version: u32,
    pub requests: &'static [MessageDesc],
    pub events: &'static [MessageDesc],
}

impl Interface {
    pub fn request(&self, opcode: u16) -> Result<&'static MessageDesc> {
        self.requests
            .get(opcode as usize)
            .ok_or(Error::UnknownOpcode {
                interface: self.name,
                opcode,
                direction: Direction::Request,
            })
    }

    pub fn event(&self, opcode: u16) -> Result<&'static MessageDesc> {
        self.events.get(opcode as usize).ok_or(Error::UnknownOpcode {
            interface: self.name,
            opcode,
            direction: Direction::Event,
        })
    }

    /// Opcode of the destroy request usable at `version`, if the interface has one.
    pub fn destructor(&self, version: u32) -> Option<u16> {
        self.requests
            .iter()
            .position(|desc| desc.destructor && desc.signature.since() <= version)
            .map(|opcode| opcode as u16)
    }
}

impl PartialEq for Interface {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Interface {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_version_prefix() {
        assert_eq!(Signature::new("4ii").since(), 4);
        assert_eq!(Signature::new("u").since(), 1);
        assert_eq!(Signature::new("").since(), 1);
        assert_eq!(Signature::new("3").since(), 3);
    }

    #[test]
    fn parses_nullable_objects() {
        assert_eq!(
            Signature::new("?oii").arguments().unwrap(),
            vec![ArgKind::OptionalObject, ArgKind::Int, ArgKind::Int]
        );
        assert_eq!(
            Signature::new("usun").arguments().unwrap(),
            vec![ArgKind::Uint, ArgKind::String, ArgKind::Uint, ArgKind::NewId]
        );
    }

    #[test]
    fn rejects_unsupported_slots() {
        assert!(Signature::new("f").arguments().is_err());
        assert!(Signature::new("?i").arguments().is_err());
    }

    #[test]
    fn destructor_respects_version() {
        static OUTPUT_LIKE: Interface = Interface {
            name: "test_output",
            version: 4,
            requests: &[MessageDesc::destructor("release", "3")],
            events: &[],
        };
        assert_eq!(OUTPUT_LIKE.destructor(2), None);
        assert_eq!(OUTPUT_LIKE.destructor(3), Some(0));
    }

    #[test]
    fn out_of_range_opcode_is_unknown() {
        static EMPTY: Interface = Interface {
            name: "empty",
            version: 1,
            requests: &[],
            events: &[],
        };
        assert!(matches!(
            EMPTY.event(0),
            Err(Error::UnknownOpcode {
                interface: "empty",
                direction: Direction::Event,
                ..
            })
        ));
    }
}
