//! Construction of values from the raw arguments editors accept.

use uuid::Uuid;

use crate::document::Document;
use crate::value::{
    Binary, Code, CodeWithScope, Date, ObjectId, Regex, RegexFlags, Timestamp, Value, ValueError,
};

/// Builds the values editors store. Every method has a default; override the
/// ones whose representation should differ.
pub trait ValueFactory {
    fn create_boolean(&self, value: bool) -> Value {
        Value::Boolean(value)
    }

    fn create_int(&self, value: i32) -> Value {
        Value::Int32(value)
    }

    fn create_long(&self, value: i64) -> Value {
        Value::Int64(value)
    }

    fn create_double(&self, value: f64) -> Value {
        Value::Double(value)
    }

    fn create_string(&self, value: &str) -> Value {
        Value::string(value)
    }

    fn create_symbol(&self, value: &str) -> Value {
        Value::symbol(value)
    }

    fn create_null(&self) -> Value {
        Value::Null
    }

    fn create_date(&self, millis: i64) -> Value {
        Value::Date(Date::from_millis(millis))
    }

    /// Parses ISO-8601 text into a date.
    fn parse_date(&self, iso: &str) -> Result<Value, ValueError> {
        Date::parse_iso(iso).map(Value::Date)
    }

    fn create_timestamp(&self, time: i32, inc: i32) -> Value {
        Value::Timestamp(Timestamp::new(time, inc))
    }

    fn create_object_id(&self, time: i32, machine: i32, process: i32, inc: i32) -> Value {
        Value::ObjectId(ObjectId::from_parts(time, machine, process, inc))
    }

    fn create_object_id_from_bytes(&self, bytes: [u8; 12]) -> Value {
        Value::ObjectId(ObjectId::from_bytes(bytes))
    }

    fn parse_object_id(&self, hex: &str) -> Result<Value, ValueError> {
        ObjectId::from_hex(hex).map(Value::ObjectId)
    }

    /// `flags` is a flag string such as `"im"`; unknown characters are ignored.
    fn create_regex(&self, pattern: &str, flags: &str) -> Value {
        Value::Regex(Regex::with_flag_str(pattern, flags))
    }

    fn create_regex_with_flags(&self, pattern: &str, flags: RegexFlags) -> Value {
        Value::Regex(Regex::new(pattern, flags))
    }

    fn create_binary(&self, subtype: u8, bytes: &[u8]) -> Value {
        Value::Binary(Binary::new(subtype, bytes))
    }

    fn create_uuid(&self, id: Uuid) -> Value {
        Value::Uuid(id)
    }

    fn create_code(&self, source: &str) -> Value {
        Value::Code(Code::new(source))
    }

    /// Typed rather than a [`Value`]: editors hand out a scope editor over
    /// whatever this returns.
    fn create_code_with_scope(&self, source: &str, scope: Document) -> CodeWithScope {
        CodeWithScope::new(source, scope)
    }
}

/// The factory editors use unless given another.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueFactory;

impl ValueFactory for DefaultValueFactory {}

/// Numbers accepted by the `set_number` / `add_number` editor methods.
pub trait Number: Copy + private::Sealed {
    #[doc(hidden)]
    fn create(self, factory: &dyn ValueFactory) -> Value;
}

impl Number for i32 {
    fn create(self, factory: &dyn ValueFactory) -> Value {
        factory.create_int(self)
    }
}

impl Number for i64 {
    fn create(self, factory: &dyn ValueFactory) -> Value {
        factory.create_long(self)
    }
}

impl Number for f64 {
    fn create(self, factory: &dyn ValueFactory) -> Value {
        factory.create_double(self)
    }
}

mod private {
    pub trait Sealed {}

    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for f64 {}
}
