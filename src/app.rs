use std::error::Error;
use std::sync::Arc;

use minicraft_player::InputState;
use minicraft_render_raylib::{RenderContext, camera3d, draw_hud};
use raylib::prelude::*;

use crate::config::WindowConfig;
use crate::session::Session;

fn read_input(rl: &RaylibHandle) -> InputState {
    let md = rl.get_mouse_delta();
    let wheel = rl.get_mouse_wheel_move();
    InputState {
        forward: rl.is_key_down(KeyboardKey::KEY_W),
        back: rl.is_key_down(KeyboardKey::KEY_S),
        left: rl.is_key_down(KeyboardKey::KEY_A),
        right: rl.is_key_down(KeyboardKey::KEY_D),
        jump: rl.is_key_down(KeyboardKey::KEY_SPACE),
        escape: rl.is_key_pressed(KeyboardKey::KEY_ESCAPE),
        mouse_delta: (md.x, md.y),
        primary: rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_LEFT),
        secondary: rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_RIGHT),
        scroll: if wheel > 0.0 {
            1
        } else if wheel < 0.0 {
            -1
        } else {
            0
        },
    }
}

/// Open the window and run frames until it closes or Escape is pressed.
pub fn run(mut session: Session, window: &WindowConfig) -> Result<(), Box<dyn Error>> {
    let (mut rl, thread) = raylib::init()
        .size(window.width, window.height)
        .title(&window.title)
        .build();
    rl.set_target_fps(window.target_fps);
    rl.set_exit_key(None);
    rl.disable_cursor();

    let mut ctx = RenderContext::new(&mut rl, &thread)?;
    let reg = Arc::clone(session.registry());
    ctx.sync_world(&mut rl, &thread, session.world_mut(), &reg);
    log::info!(
        target: "render",
        "uploaded {} chunks ({} faces)",
        ctx.chunk_count(),
        ctx.face_count()
    );

    while !rl.window_should_close() {
        let raw = read_input(&rl);
        if raw.escape {
            break;
        }
        let out = session.step(rl.get_frame_time(), raw);
        ctx.sync_world(&mut rl, &thread, session.world_mut(), &reg);

        let cam = camera3d(session.player().camera(), window.fov);
        let overlays = session.player().draw_list();
        let lines = session.hud_lines(&out);
        let (w, h) = (rl.get_screen_width(), rl.get_screen_height());

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::SKYBLUE);
        {
            let mut d3 = d.begin_mode3D(cam);
            ctx.draw_world(&mut d3);
            ctx.draw_overlays(&mut d3, &overlays, &reg);
        }
        draw_hud(&mut d, w, h, &lines);
    }
    log::info!(
        target: "player",
        "session ended after {} frames and {} edits",
        session.frames(),
        session.edits()
    );
    Ok(())
}
