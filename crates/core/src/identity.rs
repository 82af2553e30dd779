use uuid::Uuid;

/// Namespace for chunk object ids, so the same `chunk_id` always maps to the same object.
const CHUNK_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2d3e_8a4b_4c5d_9e6f_7a8b_9c0d_1e2f);

/// `{stem}_{index}_{first 8 hex chars of md5(text)}`.
pub fn chunk_id(stem: &str, chunk_index: u64, text: &str) -> String {
    let digest = format!("{:x}", md5::compute(text.as_bytes()));
    format!("{stem}_{chunk_index}_{}", &digest[..8])
}

pub fn object_uuid(chunk_id: &str) -> Uuid {
    Uuid::new_v5(&CHUNK_NAMESPACE, chunk_id.as_bytes())
}
