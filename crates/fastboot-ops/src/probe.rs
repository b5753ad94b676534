use crate::parse::parse_variable;
use crate::{CommandRunner, DeviceFacts, LockState, SocFamily};
use tracing::{debug, info, warn};

/// Query the connected device.
///
/// Returns `None` when the lock status cannot be read, which means no
/// device is reachable. The Mediatek token query runs first; the Qualcomm
/// query is only attempted when it yields nothing.
pub async fn query_device(runner: &dyn CommandRunner) -> Option<DeviceFacts> {
    let Some(status) = query_value(runner, &["getvar", "unlocked"]).await else {
        info!("No device answered the lock-status query");
        return None;
    };
    let lock_state = LockState::from_status(&status);

    let product = query_value(runner, &["getvar", "product"]).await;

    let (soc_family, hardware_token) =
        if let Some(token) = query_value(runner, &["oem", "get_token"]).await {
            (SocFamily::Mediatek, Some(token))
        } else if let Some(token) = query_value(runner, &["getvar", "token"]).await {
            (SocFamily::Qualcomm, Some(token))
        } else {
            (SocFamily::Unknown, None)
        };

    let facts = DeviceFacts {
        lock_state,
        product,
        soc_family,
        hardware_token,
    };
    info!(
        lock_state = ?facts.lock_state,
        product = ?facts.product,
        soc_family = ?facts.soc_family,
        "Device detected"
    );
    Some(facts)
}

/// Run one query and parse the value named by its last argument.
async fn query_value(runner: &dyn CommandRunner, args: &[&str]) -> Option<String> {
    let key = args.last().copied().unwrap_or_default();
    match runner.run(args).await {
        Ok(output) if output.success() => parse_variable(key, &output.output),
        Ok(output) => {
            debug!(args = ?args, exit_code = ?output.exit_code, "Device query failed");
            None
        }
        Err(err) => {
            warn!(args = ?args, error = %err, "Device query could not run");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRunner;

    #[tokio::test]
    async fn mediatek_token_skips_qualcomm_query() {
        let runner = ScriptedRunner::new()
            .respond(&["getvar", "unlocked"], 0, "unlocked: no\n")
            .respond(&["getvar", "product"], 0, "product: raphael\n")
            .respond(&["oem", "get_token"], 0, "(bootloader) token: ABCDEF0123456789\n");

        let facts = query_device(&runner).await.unwrap();

        assert_eq!(facts.lock_state, LockState::Locked);
        assert_eq!(facts.product.as_deref(), Some("raphael"));
        assert_eq!(facts.soc_family, SocFamily::Mediatek);
        assert_eq!(
            facts.hardware_token.as_deref(),
            Some("(bootloader) token: ABCDEF0123456789")
        );
        assert!(!runner.was_called(&["getvar", "token"]));
    }

    #[tokio::test]
    async fn qualcomm_token_after_mediatek_fails() {
        let runner = ScriptedRunner::new()
            .respond(&["getvar", "unlocked"], 0, "unlocked: yes\n")
            .respond(&["getvar", "token"], 0, "token: VQEBHAEQdW5rbm93bg==\n");

        let facts = query_device(&runner).await.unwrap();

        assert_eq!(facts.lock_state, LockState::Unlocked);
        assert_eq!(facts.product, None);
        assert_eq!(facts.soc_family, SocFamily::Qualcomm);
        assert_eq!(facts.hardware_token.as_deref(), Some("VQEBHAEQdW5rbm93bg=="));
        assert!(runner.was_called(&["oem", "get_token"]));
    }

    #[tokio::test]
    async fn no_answer_means_no_device() {
        let runner = ScriptedRunner::new();
        assert_eq!(query_device(&runner).await, None);
        assert_eq!(runner.calls().len(), 1);
    }

    #[tokio::test]
    async fn missing_executable_means_no_device() {
        let runner = ScriptedRunner::missing_executable();
        assert_eq!(query_device(&runner).await, None);
    }

    #[tokio::test]
    async fn sentinel_status_is_unknown() {
        let runner = ScriptedRunner::new().respond(
            &["getvar", "unlocked"],
            0,
            "< waiting for any device >\n",
        );

        let facts = query_device(&runner).await.unwrap();
        assert_eq!(facts.lock_state, LockState::Unknown);
        assert_eq!(facts.soc_family, SocFamily::Unknown);
        assert_eq!(facts.hardware_token, None);
    }
}
