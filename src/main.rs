//! RustTickRelay - Main entry point
//!
//! Wires the relay onto ESP-IDF hardware:
//! - UART0 carries the relay traffic, TX wired straight back to RX in
//!   digital loopback: the relay talks to itself.
//! - UART1 TX (GPIO6) carries the log output: relayed messages, startup
//!   status, and the fatal diagnostic.
//!
//! Three tasks: the transmitter, the receiver, and the receive pump that
//! stands in for the per-byte receive interrupt. Every shared resource is
//! created here once and persists for the process lifetime.

#![cfg_attr(target_os = "espidf", no_std)]
#![cfg_attr(target_os = "espidf", no_main)]
#![cfg_attr(target_os = "espidf", allow(static_mut_refs))]

#[cfg(target_os = "espidf")]
mod app {
    use core::ffi::c_void;
    use core::ptr;

    use esp_idf_svc::hal::gpio::AnyIOPin;
    use esp_idf_svc::hal::prelude::Peripherals;
    use esp_idf_svc::hal::uart::{self, UartDriver, UartRxDriver};
    use esp_idf_svc::hal::units::Hertz;
    use esp_idf_svc::sys;

    use rust_tick_relay::hal::espidf::{
        self, FreeRtosClock, FreeRtosDelay, FreeRtosSemaphore, UartByteTx,
    };
    use rust_tick_relay::{
        relay_error, relay_info, ReceiverTask, RelayConfig, RelayContext, RxInterruptHandler,
        SerialLog, StartupError, TickClock, TransmitterTask,
    };

    const RELAY_BAUD_RATE: u32 = 115_200;
    const LOG_BAUD_RATE: u32 = 115_200;

    /// Created once at startup, never torn down. The tasks take their
    /// pieces out of these before the relay starts running.
    static mut CONTEXT: Option<RelayContext<FreeRtosSemaphore>> = None;
    static mut TRANSMITTER: Option<TransmitterTask<UartByteTx<'static>>> = None;
    static mut RX_PUMP: Option<(
        UartRxDriver<'static>,
        RxInterruptHandler<'static, FreeRtosSemaphore>,
    )> = None;
    static mut RECEIVER: Option<(
        ReceiverTask<'static, FreeRtosSemaphore>,
        SerialLog<UartByteTx<'static>>,
    )> = None;

    #[no_mangle]
    fn main() {
        sys::link_patches();

        // A startup failure stops everything before the relay runs. On
        // success the relay tasks own the system and this task has
        // nothing left to do.
        if start().is_ok() {
            loop {
                unsafe { sys::vTaskDelay(1000) };
            }
        }
    }

    fn start() -> Result<(), StartupError> {
        let peripherals = Peripherals::take().map_err(|_| StartupError::SerialInit)?;

        // Log port first, so later failures are visible on it.
        let log_driver = espidf::init_log_uart(
            peripherals.uart1,
            peripherals.pins.gpio6,
            LOG_BAUD_RATE,
        )?;
        let mut log = SerialLog::new(UartByteTx::new(log_driver));

        let config = RelayConfig::with_period(espidf::ms_to_ticks(1000));

        let uart_config = uart::config::Config::default().baudrate(Hertz(RELAY_BAUD_RATE));
        let relay_uart = UartDriver::new(
            peripherals.uart0,
            peripherals.pins.gpio43,
            peripherals.pins.gpio44,
            Option::<AnyIOPin>::None, // CTS
            Option::<AnyIOPin>::None, // RTS
            &uart_config,
        )
        .map_err(|_| {
            relay_error!(log, "{}", StartupError::SerialInit);
            StartupError::SerialInit
        })?;

        if unsafe { sys::uart_set_loop_back(0, true) } != 0 {
            relay_error!(log, "{}", StartupError::SerialInit);
            return Err(StartupError::SerialInit);
        }
        let (relay_tx, relay_rx) = relay_uart.into_split();

        let signal = FreeRtosSemaphore::new().map_err(|err| {
            relay_error!(log, "{}", err);
            err
        })?;

        let context = unsafe {
            CONTEXT = Some(RelayContext::new(config, signal));
            CONTEXT.as_ref().unwrap()
        };

        let start_tick = FreeRtosClock.now();
        relay_info!(
            log,
            "{} up, period={} ticks",
            env!("VERSION_STRING"),
            config.period_ticks
        );

        unsafe {
            TRANSMITTER = Some(context.transmitter(UartByteTx::new(relay_tx), start_tick));
            RX_PUMP = Some((relay_rx, context.rx_interrupt_handler()));
            RECEIVER = Some((context.receiver(start_tick), log));
        }

        // Byte delivery runs above both relay tasks, preempting them the
        // way the receive interrupt preempted everything.
        espidf::spawn_task(
            rx_pump_entry,
            "Relay RX Pump\0",
            config.task_stack_words,
            config.task_priority + 1,
            ptr::null_mut(),
        )?;
        espidf::spawn_task(
            receiver_entry,
            "Relay RX Task\0",
            config.task_stack_words,
            config.task_priority,
            ptr::null_mut(),
        )?;
        espidf::spawn_task(
            transmitter_entry,
            "Relay TX Task\0",
            config.task_stack_words,
            config.task_priority,
            ptr::null_mut(),
        )?;

        Ok(())
    }

    extern "C" fn transmitter_entry(_arg: *mut c_void) {
        let task = unsafe { TRANSMITTER.take().expect("transmitter not initialized") };
        task.run(&FreeRtosDelay)
    }

    extern "C" fn receiver_entry(_arg: *mut c_void) {
        let (receiver, mut log) = unsafe { RECEIVER.take().expect("receiver not initialized") };
        receiver.run(&FreeRtosClock, &mut log, espidf::halt)
    }

    extern "C" fn rx_pump_entry(_arg: *mut c_void) {
        let (mut rx, mut handler) = unsafe { RX_PUMP.take().expect("rx pump not initialized") };
        espidf::rx_pump(&mut rx, &mut handler)
    }
}

#[cfg(not(target_os = "espidf"))]
fn main() {
    // The relay binary only targets ESP-IDF; the library and its tests
    // carry the portable logic.
}
