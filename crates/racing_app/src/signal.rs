use std::thread;
use std::time::Duration;

use racing_logging::{racing_error, racing_warn};
use tokio_util::sync::CancellationToken;

pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// On Ctrl-C, cancels `token`, then force-exits if the run is still going after `grace`.
pub fn install_interrupt_handler(token: CancellationToken, grace: Duration) -> std::io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    thread::Builder::new()
        .name("interrupt".to_string())
        .spawn(move || {
            runtime.block_on(async move {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    racing_warn!("Cannot listen for interrupts: {}", err);
                    return;
                }
                racing_warn!("Interrupt received, letting in-flight pages finish");
                token.cancel();
                tokio::time::sleep(grace).await;
                racing_error!("Run did not stop within {:?}, exiting", grace);
                std::process::exit(INTERRUPTED_EXIT_CODE);
            });
        })?;
    Ok(())
}
