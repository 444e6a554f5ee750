#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
use pyo3::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod ast;
pub mod error;
pub mod graph;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod types;

pub use error::{BlockError, Error, ParseError};
pub use interpreter::{ErrorPolicy, Interpreter, ParseOptions, ParseReport};
pub use types::*;

/// Parses mission data and returns its missions in source order, failing on
/// the first malformed block.
pub fn parse_str(input: &str) -> Result<Vec<Mission>, BlockError> {
    parse_str_with_options(input, &ParseOptions::default()).map(ParseReport::into_missions)
}

pub fn parse_str_with_options(
    input: &str,
    options: &ParseOptions,
) -> Result<ParseReport, BlockError> {
    let lines = parser::normalize(input, options.indent_char);
    let blocks = parser::segment(lines);
    Interpreter::with_options(options.clone()).interpret(blocks)
}

pub fn parse_to_json(input: &str) -> Result<String, Error> {
    let missions = parse_str(input)?;
    Ok(serde_json::to_string_pretty(&missions)?)
}

pub fn parse_to_dot(input: &str) -> Result<String, BlockError> {
    let missions = parse_str(input)?;
    Ok(graph::missions_to_dot(&missions))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
fn parse_text(text: String) -> PyResult<String> {
    parse_to_json(&text)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pyfunction]
fn missions_to_dot(text: String) -> PyResult<String> {
    parse_to_dot(&text)
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn parse_text_wasm(text: &str) -> Result<String, JsValue> {
    parse_to_json(text).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn missions_to_dot_wasm(text: &str) -> Result<String, JsValue> {
    parse_to_dot(text).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[cfg(all(feature = "python", not(target_arch = "wasm32")))]
#[pymodule]
fn mission_tree(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(parse_text, m)?)?;
    m.add_function(wrap_pyfunction!(missions_to_dot, m)?)?;
    Ok(())
}
