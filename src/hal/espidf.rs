//! ESP-IDF (FreeRTOS) bindings for the relay's kernel collaborators.
//!
//! Everything here is a direct wrapper over `esp_idf_svc`: the binary
//! semaphore, tick counter, absolute delay, and task creation come from
//! the FreeRTOS kernel underneath the IDF, the UARTs from the IDF driver.
//! No relay logic lives in this module.

use core::ffi::{c_char, c_void};
use core::ptr;

use esp_idf_svc::hal::delay::BLOCK;
use esp_idf_svc::hal::gpio;
use esp_idf_svc::hal::peripheral::Peripheral;
use esp_idf_svc::hal::uart::{self, UartRxDriver, UartTxDriver};
use esp_idf_svc::sys;

use crate::accumulator::RxInterruptHandler;
use crate::handoff::{RaiseResult, RawBinarySignal, WaitOutcome};
use crate::relay::StartupError;
use crate::serial::ByteTx;
use crate::timing::{DelayUntil, Tick, TickClock};

const PD_TRUE: sys::BaseType_t = 1;

/// Convert milliseconds to scheduler ticks at the configured tick rate.
pub fn ms_to_ticks(ms: u32) -> Tick {
    ((ms as u64 * sys::CONFIG_FREERTOS_HZ as u64) / 1000) as Tick
}

/// Binary semaphore backed by the FreeRTOS queue machinery
/// (`xSemaphoreCreateBinary` expands to exactly this queue shape).
pub struct FreeRtosSemaphore {
    handle: sys::QueueHandle_t,
}

// SAFETY: FreeRTOS queue handles are valid from any task and from ISRs;
// the kernel serializes access internally.
unsafe impl Send for FreeRtosSemaphore {}
unsafe impl Sync for FreeRtosSemaphore {}

impl FreeRtosSemaphore {
    /// Create the semaphore, empty. The relay must not start without its
    /// handoff signal, so failure here is a startup error.
    pub fn new() -> Result<Self, StartupError> {
        let handle = unsafe {
            sys::xQueueGenericCreate(1, 0, sys::queueQUEUE_TYPE_BINARY_SEMAPHORE as u8)
        };
        if handle.is_null() {
            return Err(StartupError::SignalCreation);
        }
        Ok(Self { handle })
    }
}

impl RawBinarySignal for FreeRtosSemaphore {
    fn raise(&self) -> RaiseResult {
        let mut task_woken: sys::BaseType_t = 0;
        let gave = unsafe { sys::xQueueGiveFromISR(self.handle, &mut task_woken) };
        RaiseResult {
            pended: gave == PD_TRUE,
            task_woken: task_woken == PD_TRUE,
        }
    }

    fn acquire(&self, timeout_ticks: Tick) -> WaitOutcome {
        let taken = unsafe { sys::xQueueSemaphoreTake(self.handle, timeout_ticks) };
        if taken == PD_TRUE {
            WaitOutcome::Signaled
        } else {
            WaitOutcome::TimedOut
        }
    }
}

/// The kernel tick counter.
pub struct FreeRtosClock;

impl TickClock for FreeRtosClock {
    fn now(&self) -> Tick {
        unsafe { sys::xTaskGetTickCount() }
    }
}

/// Absolute-time delay via `xTaskDelayUntil`.
pub struct FreeRtosDelay;

impl DelayUntil for FreeRtosDelay {
    fn delay_until(&self, deadline: Tick) {
        let mut wake = unsafe { sys::xTaskGetTickCount() };
        let increment = deadline.wrapping_sub(wake);
        // A zero or already-passed deadline (wrapped difference in the far
        // half of the tick range) means no wait this cycle.
        if increment == 0 || increment > Tick::MAX / 2 {
            return;
        }
        unsafe {
            sys::xTaskDelayUntil(&mut wake, increment);
        }
    }
}

/// Byte transmit over an IDF UART TX driver.
///
/// The driver call blocks until the TX FIFO accepts the byte; the
/// busy-wait on the hardware-ready flag lives inside it.
pub struct UartByteTx<'d> {
    driver: UartTxDriver<'d>,
}

impl<'d> UartByteTx<'d> {
    /// Wrap an installed TX driver.
    pub fn new(driver: UartTxDriver<'d>) -> Self {
        Self { driver }
    }
}

impl ByteTx for UartByteTx<'_> {
    fn send_byte(&mut self, byte: u8) {
        let _ = self.driver.write(&[byte]);
    }
}

/// Install a TX-only UART for the relay log output.
pub fn init_log_uart<'d>(
    uart: impl Peripheral<P = esp_idf_svc::hal::uart::UART1> + 'd,
    tx_pin: impl Peripheral<P = impl gpio::OutputPin> + 'd,
    baud_rate: u32,
) -> Result<UartTxDriver<'d>, StartupError> {
    let uart_config =
        uart::config::Config::default().baudrate(esp_idf_svc::hal::units::Hertz(baud_rate));

    UartTxDriver::new(
        uart,
        tx_pin,
        Option::<gpio::AnyIOPin>::None, // CTS
        Option::<gpio::AnyIOPin>::None, // RTS
        &uart_config,
    )
    .map_err(|_| StartupError::SerialInit)
}

/// Receive pump: delivers inbound bytes one at a time to the relay's
/// interrupt handler.
///
/// The IDF UART driver owns the hardware RX interrupt and buffers bytes
/// internally; this loop re-serializes them into the per-byte delivery
/// the handler contract expects. It runs at a priority above both relay
/// tasks so that delivery preempts processing, as the raw receive
/// interrupt did. The handler's yield request needs no action here: the
/// semaphore give already makes the receiver runnable, and the scheduler
/// preempts on our next blocking read.
pub fn rx_pump<S: RawBinarySignal>(
    rx: &mut UartRxDriver<'_>,
    handler: &mut RxInterruptHandler<'_, S>,
) -> ! {
    let mut byte = [0u8; 1];
    loop {
        if let Ok(1) = rx.read(&mut byte, BLOCK) {
            let _ = handler.on_byte_received(byte[0]);
        }
    }
}

/// Create a task with a fixed stack and priority, pinned to core 0.
///
/// `entry` must never return.
pub fn spawn_task(
    entry: unsafe extern "C" fn(*mut c_void),
    name: &'static str,
    stack_words: usize,
    priority: u8,
    arg: *mut c_void,
) -> Result<(), StartupError> {
    debug_assert!(name.ends_with('\0'));
    let created = unsafe {
        sys::xTaskCreatePinnedToCore(
            Some(entry),
            name.as_ptr() as *const c_char,
            // IDF task stacks are sized in bytes, not words.
            (stack_words * core::mem::size_of::<u32>()) as u32,
            arg,
            priority as u32,
            ptr::null_mut(),
            0,
        )
    };
    if created == PD_TRUE {
        Ok(())
    } else {
        Err(StartupError::TaskCreation)
    }
}

/// Park the calling task forever.
///
/// The fatal diagnostic has already gone out when this is reached;
/// nothing observable happens afterwards.
pub fn halt() -> ! {
    loop {
        unsafe {
            sys::vTaskDelay(Tick::MAX);
        }
    }
}
