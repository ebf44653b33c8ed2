use std::rc::Rc;

use anyhow::Result;
use log::{debug, info, warn};
use winit::{
    event::{DeviceEvent, ElementState, Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowBuilder},
};

mod core;
mod engine;
mod game;

use crate::core::hierarchy::SceneGraph;
use engine::game_loop::GameLoop;
use engine::input::{ActionDispatcher, GameFlowGate, InputConfig, InputSettings, PlayerInputHandler};
use game::{ControllerStats, GameFlowManager, PlayerController};

/// Lock and hide the pointer for mouse look
fn lock_cursor(window: &Window) {
    let grabbed = window
        .set_cursor_grab(CursorGrabMode::Locked)
        .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined));
    if let Err(err) = grabbed {
        warn!("Could not grab cursor: {}", err);
    }
    window.set_cursor_visible(false);
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    info!("Starting FPS input demo...");

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let window = WindowBuilder::new()
        .with_title("FPS Input")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");
    lock_cursor(&window);

    // Game flow and input
    let game_flow = Rc::new(GameFlowManager::new());
    let gate: Rc<dyn GameFlowGate> = game_flow.clone();
    let settings = InputSettings::default();
    let mut dispatcher = ActionDispatcher::new(InputConfig::default());
    let mut input = PlayerInputHandler::new(settings, Some(gate));
    let mut game_loop = GameLoop::new();
    info!(
        "Look sensitivity {:.2}, invert Y {}",
        input.settings().effective_look_sensitivity(),
        input.settings().invert_y_axis
    );

    // Player rig: body -> camera -> weapon socket
    let mut scene = SceneGraph::new();
    let body = scene.spawn(None);
    let camera = scene.spawn(None);
    let weapon_socket = scene.spawn(Some(camera));
    scene.set_parent(camera, Some(body))?;
    scene.insert_component(body, PlayerController::new(ControllerStats::default()));

    let Some(player) = scene.find_ancestor_with::<PlayerController>(weapon_socket) else {
        anyhow::bail!("Weapon socket is not attached to a player");
    };
    if let Some(owner) = scene.find_component_in_parent::<PlayerController>(weapon_socket) {
        info!("Weapon socket owner carries {} weapons", owner.stats.weapon_count);
    }

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    info!(
                        "Close requested after {:.1}s and {} frames, shutting down...",
                        game_loop.elapsed().as_secs_f32(),
                        game_loop.frame_count()
                    );
                    elwt.exit();
                }
                WindowEvent::Focused(focused) => {
                    if focused {
                        lock_cursor(&window);
                    } else {
                        dispatcher.release_all();
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    // Escape ends the match; handled outside the bindings
                    if event.physical_key == PhysicalKey::Code(KeyCode::Escape)
                        && event.state == ElementState::Pressed
                    {
                        game_flow.end_game();
                    }
                    dispatcher.process_keyboard_event(&event);
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    dispatcher.process_mouse_button(button, state);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    dispatcher.process_mouse_wheel(delta);
                }
                _ => {}
            },
            Event::DeviceEvent {
                event: DeviceEvent::MouseMotion { delta: (dx, dy) },
                ..
            } => {
                dispatcher.process_mouse_motion(dx, dy);
            }
            Event::AboutToWait => {
                let dt = game_loop.begin_frame();
                dispatcher.begin_frame();
                input.set_delta_time(dt);
                dispatcher.dispatch(&mut input);

                game_loop.begin_update();
                if let Some(controller) = scene.get_component_mut::<PlayerController>(player) {
                    controller.update(&mut input, game_loop.delta_time());

                    if game_loop.frame_count() % 120 == 0 {
                        debug!(
                            "pos {:?} yaw {:.1} pitch {:.1} weapon {} fps {:.0}",
                            controller.position,
                            controller.yaw,
                            controller.pitch,
                            controller.active_weapon,
                            game_loop.fps()
                        );
                        debug!(
                            "crouch {} aim {} sprint {} firing {} shots {} reloads {} jumps {}",
                            controller.is_crouching,
                            controller.is_aiming,
                            controller.is_sprinting,
                            controller.is_firing,
                            controller.shots_fired,
                            controller.reloads,
                            controller.jumps
                        );
                    }
                }

                game_loop.begin_late_update();
                game_loop.end_frame();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
