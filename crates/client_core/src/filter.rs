use shared::domain::Doctor;

/// Doctors whose name contains `query`, ignoring case. Only the name is
/// searched; order follows `doctors`.
pub fn filter_doctors<'a>(doctors: &'a [Doctor], query: &str) -> Vec<&'a Doctor> {
    if query.is_empty() {
        return doctors.iter().collect();
    }

    let needle = query.to_lowercase();
    doctors
        .iter()
        .filter(|doctor| doctor.name.to_lowercase().contains(&needle))
        .collect()
}
