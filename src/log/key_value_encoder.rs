//! A log4rs encoder that appends each record's key-value pairs.
//!
//! The message is rendered by a regular pattern, then every structured field
//! attached at the call site (`debug!(command = name; "...")`) follows as
//! ` key=value`. Values containing whitespace are quoted.

use std::io;

use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::{Color, Encode, Style, Write};
use serde::Deserialize;

const DEFAULT_PATTERN: &str = "{d} {l} {t} - {m}";

#[derive(Debug, Deserialize)]
pub struct KeyValueEncoderConfig {
    pub pattern: Option<String>,
}

#[derive(Debug)]
pub struct KeyValueEncoder {
    message: PatternEncoder,
}

impl KeyValueEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            message: PatternEncoder::new(pattern),
        }
    }
}

impl Encode for KeyValueEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.message.encode(w, record)?;

        let mut pairs = PairWriter { writer: w, failure: None };
        if let Err(kv_err) = record.key_values().visit(&mut pairs) {
            match pairs.failure.take() {
                Some(io_err) => return Err(io_err.into()),
                None => write!(w, " [kv error: {}]", kv_err)?,
            }
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

struct PairWriter<'a> {
    writer: &'a mut dyn Write,
    failure: Option<io::Error>,
}

impl PairWriter<'_> {
    fn write_pair(&mut self, key: &Key<'_>, value: &Value<'_>) -> io::Result<()> {
        self.writer.set_style(Style::new().text(Color::Cyan))?;
        write!(self.writer, " {}=", key)?;
        self.writer.set_style(&Style::default())?;

        let rendered = value.to_string();
        if rendered.is_empty() || rendered.contains(char::is_whitespace) {
            write!(self.writer, "{:?}", rendered)
        } else {
            self.writer.write_all(rendered.as_bytes())
        }
    }
}

impl<'kvs> VisitSource<'kvs> for PairWriter<'_> {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        self.write_pair(&key, &value).map_err(|e| {
            self.failure = Some(e);
            Error::msg("io error while writing key-value pair")
        })
    }
}

/// Registers the encoder under `kind: key_values` in log4rs YAML files.
pub struct KeyValueEncoderDeserializer;

impl log4rs::config::Deserialize for KeyValueEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = KeyValueEncoderConfig;

    fn deserialize(
        &self,
        config: KeyValueEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let pattern = config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        Ok(Box::new(KeyValueEncoder::new(pattern)))
    }
}
