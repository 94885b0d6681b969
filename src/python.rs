//! Python extension module.
//!
//! Every entry point takes `*args` and fingerprints the first argument, which
//! must be `str`, `bytes`, `bytearray` or `memoryview`. Numbers are returned as
//! `int`, hex as `str` and byte output as `bytes`.

use pyo3::buffer::PyBuffer;
use pyo3::create_exception;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyByteArray, PyBytes, PyMemoryView, PyString, PyTuple};

use crate::core::Digest;
use crate::dispatch::{self, EntryPoint};
use crate::encode::Encoded;
use crate::error::{FingerprintError, Result as FingerprintResult};
use crate::input::HostValue;

create_exception!(fingerprint, MissingArgumentError, PyTypeError);
create_exception!(fingerprint, UnsupportedInputTypeError, PyTypeError);
create_exception!(fingerprint, MalformedDigestError, PyValueError);

impl From<FingerprintError> for PyErr {
    fn from(err: FingerprintError) -> PyErr {
        let msg = err.to_string();
        match err {
            FingerprintError::MissingArgument => MissingArgumentError::new_err(msg),
            FingerprintError::UnsupportedInputType { .. } => {
                UnsupportedInputTypeError::new_err(msg)
            }
            FingerprintError::MalformedDigest(_) => MalformedDigestError::new_err(msg),
        }
    }
}

/// Recognize the host value's shape and run `entry` on it.
///
/// Buffers are borrowed in place. The GIL is held for the whole call and
/// dispatch runs no Python code, so nothing can resize or free them meanwhile.
fn call(py: Python<'_>, entry: EntryPoint, args: &Bound<'_, PyTuple>) -> PyResult<PyObject> {
    let Ok(value) = args.get_item(0) else {
        log::debug!("{}: called without arguments", entry.name());
        return Err(FingerprintError::MissingArgument.into());
    };

    let encoded = if let Ok(text) = value.downcast::<PyString>() {
        match text.to_str() {
            Ok(utf8) => dispatch::fingerprint(entry, HostValue::Text(utf8)),
            // lone surrogates: go through UTF-16 so each one becomes a single U+FFFD
            Err(_) => {
                let units = utf16_units(text)?;
                dispatch::fingerprint(entry, HostValue::WideText(&units))
            }
        }
    } else if let Ok(bytes) = value.downcast::<PyBytes>() {
        dispatch::fingerprint(entry, HostValue::Buffer(bytes.as_bytes()))
    } else if let Ok(array) = value.downcast::<PyByteArray>() {
        // SAFETY: GIL held, no Python code runs until the borrow ends.
        let content = unsafe { array.as_bytes() };
        dispatch::fingerprint(entry, HostValue::Growable(content))
    } else if let Ok(view) = value.downcast::<PyMemoryView>() {
        fingerprint_memoryview(entry, view)?
    } else {
        let type_name = value.get_type().to_string();
        dispatch::fingerprint(entry, HostValue::Other(&type_name))
    }?;

    Ok(to_py(py, encoded))
}

fn utf16_units(text: &Bound<'_, PyString>) -> PyResult<Vec<u16>> {
    let encoded = text
        .call_method1("encode", ("utf-16-le", "surrogatepass"))?
        .downcast_into::<PyBytes>()?;
    Ok(encoded
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}

/// Hash a memoryview's window without copying it. When the exporting object
/// has a flat byte buffer the window is passed as (backing, offset, len).
fn fingerprint_memoryview(
    entry: EntryPoint,
    view: &Bound<'_, PyMemoryView>,
) -> PyResult<FingerprintResult<Encoded>> {
    if !view.getattr("c_contiguous")?.is_truthy()? {
        return Ok(dispatch::fingerprint(
            entry,
            HostValue::Other("non-contiguous memoryview"),
        ));
    }
    // cast('B') reshapes the view only; the data is not copied
    let window_buf = PyBuffer::<u8>::get_bound(&view.call_method1("cast", ("B",))?)?;
    let window = buffer_bytes(&window_buf);

    let exporter = view.getattr("obj")?;
    let backing_buf = PyBuffer::<u8>::get_bound(&exporter)
        .ok()
        .filter(|buf| buf.is_c_contiguous());

    let value = match backing_buf.as_ref().map(buffer_bytes) {
        Some(backing) => match locate(backing, window) {
            Some(offset) => HostValue::View {
                backing,
                offset,
                len: window.len(),
            },
            None => HostValue::Buffer(window),
        },
        None => HostValue::Buffer(window),
    };
    Ok(dispatch::fingerprint(entry, value))
}

/// Borrow a C-contiguous byte buffer.
fn buffer_bytes(buffer: &PyBuffer<u8>) -> &[u8] {
    let len = buffer.len_bytes();
    if len == 0 {
        return &[];
    }
    // SAFETY: callers pass C-contiguous buffers; the export stays alive as long
    // as `buffer` does and the GIL is held throughout the call.
    unsafe { std::slice::from_raw_parts(buffer.buf_ptr() as *const u8, len) }
}

/// Offset of `window` inside `backing`, if it lies entirely within it.
fn locate(backing: &[u8], window: &[u8]) -> Option<usize> {
    let offset = (window.as_ptr() as usize).checked_sub(backing.as_ptr() as usize)?;
    let end = offset.checked_add(window.len())?;
    (end <= backing.len()).then_some(offset)
}

fn to_py(py: Python<'_>, encoded: Encoded) -> PyObject {
    match encoded {
        Encoded::Number(Digest::W32(v)) => v.into_py(py),
        Encoded::Number(Digest::W64(v)) => v.into_py(py),
        Encoded::Number(Digest::W128(v)) => v.into_py(py),
        Encoded::Hex(hex) => hex.into_py(py),
        Encoded::Bytes(bytes) => PyBytes::new_bound(py, &bytes).into_py(py),
    }
}

macro_rules! entry_points {
    ($($name:ident => $entry:expr),* $(,)?) => {
        $(
            #[pyfunction]
            #[pyo3(signature = (*args))]
            fn $name(py: Python<'_>, args: &Bound<'_, PyTuple>) -> PyResult<PyObject> {
                call(py, $entry, args)
            }
        )*

        fn add_entry_points(m: &Bound<'_, PyModule>) -> PyResult<()> {
            $( m.add_function(wrap_pyfunction!($name, m)?)?; )*
            Ok(())
        }
    };
}

entry_points! {
    fingerprint32 => EntryPoint::Fingerprint32,
    fingerprint32_hex => EntryPoint::Fingerprint32Hex,
    fingerprint32_bytes => EntryPoint::Fingerprint32Bytes,
    fingerprint64 => EntryPoint::Fingerprint64,
    fingerprint64_hex => EntryPoint::Fingerprint64Hex,
    fingerprint64_bytes => EntryPoint::Fingerprint64Bytes,
    fingerprint128 => EntryPoint::Fingerprint128,
    fingerprint128_hex => EntryPoint::Fingerprint128Hex,
    fingerprint128_bytes => EntryPoint::Fingerprint128Bytes,
}

/// xxHash fingerprints (XXH32, XXH64, XXH3-128). Not FarmHash-compatible.
#[pymodule]
fn fingerprint(m: &Bound<'_, PyModule>) -> PyResult<()> {
    add_entry_points(m)?;
    let py = m.py();
    m.add("MissingArgumentError", py.get_type_bound::<MissingArgumentError>())?;
    m.add(
        "UnsupportedInputTypeError",
        py.get_type_bound::<UnsupportedInputTypeError>(),
    )?;
    m.add("MalformedDigestError", py.get_type_bound::<MalformedDigestError>())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::to_bytes;

    const EMPTY32: u32 = 0x02cc_5d05;
    const EMPTY64: u64 = 0xef46_db37_51d8_e999;
    const EMPTY128: u128 = 0x99aa_06d3_0147_98d8_6001_c324_468d_497f;

    fn with_module(test: impl FnOnce(Python<'_>, &Bound<'_, PyModule>)) {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let module = wrap_pymodule!(super::fingerprint)(py).into_bound(py);
            test(py, &module);
        });
    }

    fn eval<'py>(py: Python<'py>, code: &str) -> Bound<'py, PyAny> {
        py.eval_bound(code, None, None).unwrap()
    }

    fn call_entry<'py>(
        module: &Bound<'py, PyModule>,
        name: &str,
        value: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyAny>> {
        module.getattr(name)?.call1((value.clone(),))
    }

    #[test]
    fn test_empty_inputs_match_goldens() {
        with_module(|py, m| {
            for code in [
                "''",
                "b''",
                "bytearray()",
                "memoryview(b'')",
                "memoryview(bytearray(b'abc'))[1:1]",
            ] {
                let value = eval(py, code);
                let n32: u32 = call_entry(m, "fingerprint32", &value).unwrap().extract().unwrap();
                let n64: u64 = call_entry(m, "fingerprint64", &value).unwrap().extract().unwrap();
                let n128: u128 = call_entry(m, "fingerprint128", &value)
                    .unwrap()
                    .extract()
                    .unwrap();
                let hex: String = call_entry(m, "fingerprint32_hex", &value)
                    .unwrap()
                    .extract()
                    .unwrap();
                assert_eq!(n32, EMPTY32, "{code}");
                assert_eq!(n64, EMPTY64, "{code}");
                assert_eq!(n128, EMPTY128, "{code}");
                assert_eq!(hex, "02cc5d05", "{code}");
            }
        });
    }

    #[test]
    fn test_all_shapes_agree_with_text() {
        let expected = dispatch::fingerprint128_hex("hello").unwrap();
        with_module(|py, m| {
            for code in [
                "'hello'",
                "b'hello'",
                "bytearray(b'hello')",
                "memoryview(b'hello')",
            ] {
                let hex: String = call_entry(m, "fingerprint128_hex", &eval(py, code))
                    .unwrap()
                    .extract()
                    .unwrap();
                assert_eq!(hex, expected, "{code}");
            }
        });
    }

    #[test]
    fn test_memoryview_hashes_only_its_window() {
        let expected = dispatch::fingerprint64_hex(&b"payload"[..]).unwrap();
        with_module(|py, m| {
            for code in [
                "memoryview(b'prefix-payload-suffix')[7:14]",
                "memoryview(bytearray(b'prefix-payload-suffix'))[7:14]",
            ] {
                let hex: String = call_entry(m, "fingerprint64_hex", &eval(py, code))
                    .unwrap()
                    .extract()
                    .unwrap();
                assert_eq!(hex, expected, "{code}");
            }
        });
    }

    #[test]
    fn test_wide_results_are_ints_and_bytes() {
        with_module(|py, m| {
            let value = eval(py, "'hello'");
            let n128: u128 = call_entry(m, "fingerprint128", &value).unwrap().extract().unwrap();
            assert_eq!(n128, dispatch::fingerprint128("hello").unwrap());

            let raw = call_entry(m, "fingerprint32_bytes", &eval(py, "b''"))
                .unwrap()
                .downcast_into::<PyBytes>()
                .unwrap();
            assert_eq!(raw.as_bytes(), to_bytes(Digest::W32(EMPTY32)).as_slice());
        });
    }

    #[test]
    fn test_lone_surrogate_matches_utf16_path() {
        let units: [u16; 3] = [0x61, 0xd800, 0x62];
        let expected = dispatch::fingerprint32(HostValue::WideText(&units)).unwrap();
        assert_eq!(expected, dispatch::fingerprint32("a\u{fffd}b").unwrap());
        with_module(|py, m| {
            let n32: u32 = call_entry(m, "fingerprint32", &eval(py, "'a\\ud800b'"))
                .unwrap()
                .extract()
                .unwrap();
            assert_eq!(n32, expected);
        });
    }

    #[test]
    fn test_error_types() {
        with_module(|py, m| {
            let f = m.getattr("fingerprint32").unwrap();
            let err = f.call0().unwrap_err();
            assert!(err.is_instance_of::<MissingArgumentError>(py));
            assert!(err.is_instance_of::<PyTypeError>(py));

            for code in ["1", "{}", "None", "memoryview(b'abcdef')[::2]"] {
                let err = f.call1((eval(py, code),)).unwrap_err();
                assert!(err.is_instance_of::<UnsupportedInputTypeError>(py), "{code}");
                assert!(err.is_instance_of::<PyTypeError>(py), "{code}");
            }

            assert!(m.getattr("MissingArgumentError").is_ok());
            assert!(m.getattr("UnsupportedInputTypeError").is_ok());
        });
    }

    #[test]
    fn test_locate_window() {
        let backing = b"prefix-payload-suffix";
        assert_eq!(locate(backing, &backing[7..14]), Some(7));
        assert_eq!(locate(backing, &backing[..]), Some(0));
        let other = *b"payload";
        assert_eq!(locate(backing, &other), None);
        assert_eq!(locate(&backing[7..14], &backing[..]), None);
    }
}
