//! Main teleoperation executable entry point.
//!
//! # Architecture
//!
//! The executable wires the library together:
//!
//!     - Initialise the session, logger and parameters
//!     - Start the control thread with the (simulated) actuators
//!     - Start the camera relay and the (simulated) camera
//!     - Feed operator input to the control thread, either:
//!         - from a key-event script given as the only argument, or
//!         - from the interactive console
//!     - Stop the camera and the control thread, leaving the robot stopped

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod console;
mod script_runner;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::{eyre, WrapErr}, Report};
use log::{debug, info};
use std::env;
use teleop_if::eqpt::FrameSource;

// Internal
use teleop_lib::{
    cam_relay::CamRelay,
    params::TeleopParams,
    sim::{SimActuator, SimCamera, SimDisplay},
    teleop::Teleop,
};
use util::{
    host,
    logger::{logger_init, LevelFilter},
    script_interpreter::ScriptInterpreter,
    session::Session,
};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Where operator input comes from.
enum InputSource {
    Script(ScriptInterpreter),
    Console,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    // If we have a single argument use it as the script path
    let script = match args.len() {
        1 => None,
        2 => Some(args[1].clone()),
        n => return Err(eyre!("Expected either zero or one argument, found {}", n - 1))
    };

    // Initialise session
    let session = Session::new("teleop_exec", "sessions")
        .wrap_err("Failed to create the session")?;

    // Initialise logger, the console prints to stdout itself so only
    // warnings are echoed there in interactive mode
    logger_init(LevelFilter::Debug, &session, script.is_some())
        .wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Delayed Teleoperation Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    debug!("CLI arguments: {:?}", args);

    // ---- LOAD PARAMETERS ----

    let params: TeleopParams = util::params::load("teleop_exec.toml")
        .wrap_err("Could not load teleop_exec params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE INPUT SOURCE ----

    let source = match script {
        Some(path) => {
            info!("Loading script from \"{}\"", path);

            let si = ScriptInterpreter::new(&path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} actions\n",
                si.get_duration(),
                si.get_num_actions()
            );

            InputSource::Script(si)
        },
        None => {
            info!("No script provided, input will be read from the console\n");
            InputSource::Console
        }
    };

    // ---- INITIALISE CONTROL ----

    let teleop = Teleop::spawn(&params, Box::new(SimActuator::new()))
        .wrap_err("Failed to start the control thread")?;
    let handle = teleop.handle();

    // ---- INITIALISE CAMERA ----

    let (relay, frame_sender) = CamRelay::start(Box::new(SimDisplay::new()))
        .wrap_err("Failed to start the camera relay")?;

    let mut camera = SimCamera::new(params.sim_cam.clone());
    camera.start(frame_sender).wrap_err("Failed to start the camera")?;

    info!("Initialisation complete\n");

    // ---- MAIN LOOP ----

    let result = match source {
        InputSource::Script(si) => script_runner::run(&handle, si),
        InputSource::Console => console::run(&handle, &session)
    };

    // ---- SHUTDOWN ----

    info!("Shutting down");

    camera.stop();
    relay.join().wrap_err("Failed to stop the camera relay")?;

    teleop.shutdown();

    result
}
