use uuid::Uuid;

/// Fresh 128-bit random identifier as lowercase hex. Used for generated case
/// ids and for the per-render submission id.
pub fn new_identifier() -> String {
    Uuid::new_v4().simple().to_string()
}
