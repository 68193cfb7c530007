//! Gesture Handle - runs a gesture driver as a tokio task
//!
//! Pointer inputs arrive over an mpsc channel; hold ticks are scheduled with
//! `sleep_until` on the driver's next deadline. The task stops when the handle
//! is shut down or every sender is gone, ending any active gesture first.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::JoystickError;
use crate::gesture::driver::{GestureDriver, GestureSettings, PointerInput};
use crate::gesture::listener::MovementListener;
use crate::state::{JoystickEventsHolder, SharedState};

const INPUT_BUFFER_CAPACITY: usize = 100;

pub struct GestureHandle {
    input_sender: mpsc::Sender<PointerInput>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl GestureHandle {
    pub fn spawn(
        joystick: SharedState,
        listener: Box<dyn MovementListener>,
        settings: GestureSettings,
    ) -> Result<Self, JoystickError> {
        info!("Spawning gesture driver with settings: {:?}", settings);
        settings.validate()?;

        let (input_sender, input_receiver) = mpsc::channel(INPUT_BUFFER_CAPACITY);
        debug!(
            "Created pointer input channel with buffer capacity {}",
            INPUT_BUFFER_CAPACITY
        );

        let cancel = CancellationToken::new();
        let driver = GestureDriver::new(joystick, listener, settings);

        let task = tokio::spawn(run_gesture_loop(driver, input_receiver, cancel.clone()));

        info!("Gesture driver successfully started");
        Ok(Self {
            input_sender,
            cancel,
            task,
        })
    }

    /// Spawns a driver that writes to the holder's state and publishes through it.
    pub fn spawn_for_holder(
        holder: &JoystickEventsHolder,
        settings: GestureSettings,
    ) -> Result<Self, JoystickError> {
        Self::spawn(holder.state().clone(), Box::new(holder.clone()), settings)
    }

    /// Sender for feeding pointer input from another task
    pub fn sender(&self) -> mpsc::Sender<PointerInput> {
        self.input_sender.clone()
    }

    pub async fn send(&self, input: PointerInput) -> Result<(), JoystickError> {
        self.input_sender
            .send(input)
            .await
            .map_err(|e| JoystickError::ChannelError(format!("Failed to send pointer input: {}", e)))
    }

    pub fn try_send(&self, input: PointerInput) -> Result<(), JoystickError> {
        self.input_sender
            .try_send(input)
            .map_err(|e| JoystickError::ChannelError(format!("Failed to send pointer input: {}", e)))
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancels the driver, ending any active gesture, and waits for the task.
    pub async fn shutdown(self) -> Result<(), JoystickError> {
        info!("Shutting down gesture driver");
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| JoystickError::TaskError(format!("Gesture task failed: {}", e)))?;
        info!("Gesture driver stopped");
        Ok(())
    }
}

async fn run_gesture_loop(
    mut driver: GestureDriver,
    mut inputs: mpsc::Receiver<PointerInput>,
    cancel: CancellationToken,
) {
    info!("Entering gesture loop");
    loop {
        let deadline = driver.next_hold_deadline();

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                debug!("Gesture loop cancelled");
                driver = driver.cancel();
                break;
            }
            input = inputs.recv() => match input {
                Some(input) => {
                    debug!("Pointer input: {:?}", input);
                    driver = driver.handle(input, Instant::now());
                }
                None => {
                    debug!("All pointer input senders dropped, ending gesture loop");
                    driver = driver.cancel();
                    break;
                }
            },
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                driver = driver.poll_hold(Instant::now());
            }
        }
    }
    info!("Gesture loop finished in phase {}", driver.phase());
}
