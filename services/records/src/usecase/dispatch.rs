use std::future::Future;

use anyhow::Context as _;

use crate::domain::notify::{Notifier, OutgoingEmail};
use crate::domain::repository::IdentityProvider;
use crate::domain::types::{Course, Enrollment, Student, Teacher};

/// Run a notification on its own task once the write has committed.
///
/// The response path never waits for it. Failures end at a `warn` log.
pub fn spawn_best_effort<F>(notification: &'static str, work: F)
where
    F: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = work.await {
            tracing::warn!(notification, error = %format!("{e:#}"), "notification not sent");
        }
    });
}

/// Resolve the student's address and send the enrollment confirmation.
/// Students without a linked identity have no address and are skipped.
pub async fn send_enrollment_confirmation<I, N>(
    identities: &I,
    notifier: &N,
    student: &Student,
    course: &Course,
    enrollment: &Enrollment,
) -> anyhow::Result<()>
where
    I: IdentityProvider,
    N: Notifier,
{
    let Some(identity_id) = student.identity_id else {
        tracing::debug!(student_id = %student.id, "no identity linked, skipping confirmation");
        return Ok(());
    };
    let identity = identities
        .find_by_id(identity_id)
        .await
        .context("resolve student identity")?
        .context("student identity not found")?;
    let email = OutgoingEmail::enrollment_confirmation(
        &identity.email,
        &identity.full_name,
        &course.title,
        enrollment.enrollment_date,
    );
    notifier
        .send(email)
        .await
        .context("send enrollment confirmation")?;
    tracing::info!(enrollment_id = %enrollment.id, "enrollment confirmation sent");
    Ok(())
}

pub async fn send_teacher_welcome<N: Notifier>(
    notifier: &N,
    teacher: &Teacher,
    email: &str,
    full_name: &str,
) -> anyhow::Result<()> {
    notifier
        .send(OutgoingEmail::teacher_welcome(
            email,
            full_name,
            &teacher.department,
        ))
        .await
        .context("send teacher welcome")?;
    tracing::info!(teacher_id = %teacher.id, "teacher welcome sent");
    Ok(())
}
