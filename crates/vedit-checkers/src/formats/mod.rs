//! Built-in format checkers.

mod csv;
mod ini;
mod json;
mod php;
mod python;
mod readable;
mod shell;
mod toml;
mod xml;
mod yaml;

pub use self::csv::CsvChecker;
pub use self::ini::IniChecker;
pub use self::json::JsonChecker;
pub use self::php::PhpChecker;
pub use self::python::PythonChecker;
pub use self::readable::ReadableTextChecker;
pub use self::shell::ShellChecker;
pub use self::toml::TomlChecker;
pub use self::xml::XmlChecker;
pub use self::yaml::YamlChecker;
