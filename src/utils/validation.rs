//! Utilidades de validación
//!
//! Helpers para convertir los errores de `validator` en los mensajes
//! que devuelve la API.

use validator::{ValidationError, ValidationErrors};

/// Primer mensaje de error siguiendo el orden de campos indicado.
///
/// `ValidationErrors` guarda los campos en un `HashMap`, así que el orden
/// se fija desde fuera para que el mensaje sea determinista.
pub fn first_validation_message(errors: &ValidationErrors, field_order: &[&'static str]) -> String {
    let field_errors = errors.field_errors();

    let ordered = field_order
        .iter()
        .filter_map(|field| field_errors.get(field).map(|errs| (*field, *errs)));

    let mut remaining: Vec<_> = field_errors
        .iter()
        .filter(|(field, _)| !field_order.contains(*field))
        .map(|(field, errs)| (*field, *errs))
        .collect();
    remaining.sort_by_key(|(field, _)| *field);

    ordered
        .chain(remaining)
        .flat_map(|(field, errs)| errs.iter().map(move |err| describe(field, err)))
        .next()
        .unwrap_or_else(|| "invalid input".to_string())
}

fn describe(field: &str, error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => format!("{} is invalid ({})", field, error.code),
    }
}

/// Validar que todos los identificadores sean no negativos
pub fn validate_non_negative_ids(ids: &[i32]) -> Result<(), ValidationError> {
    if let Some(bad) = ids.iter().find(|id| **id < 0) {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), bad);
        error.message = Some("ids should be non-negative".into());
        return Err(error);
    }
    Ok(())
}
