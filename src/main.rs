// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod content;
mod display;
mod geometry;
mod overlay;
mod particles;
mod reveal;
mod util;

use std::time::Instant;

use content::{layout, Page, PageLayout};
use display::{Display, InputEvent, PixelBuffer, RenderTarget, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use geometry::measure_regions;
use overlay::{RevealStyle, SpoilerOverlay};
use sdl2::keyboard::Keycode;
use util::FpsCounter;

const PAGE_FILE: &str = "page.json";
const BASE_SEED: u32 = 0x5EED;

/// Consecutive present failures tolerated before failing open
/// (revealing everything rather than leaving content stuck covered)
const MAX_PRESENT_FAILURES: u32 = 30;

/// Parse command line arguments and return (width, height, vsync, style)
fn parse_args() -> (u32, u32, bool, RevealStyle) {
    let args: Vec<String> = std::env::args().collect();
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut vsync = true;
    let mut style = RevealStyle::Particles;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => vsync = false,
            "--cover" => style = RevealStyle::Cover,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1280x960)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            width = w;
                            height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: shroud [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1280x960)");
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --cover               Plain covers instead of particle fields");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (width, height, vsync, style)
}

/// One overlay slot per page block, None where the block has no spoiler
fn build_overlays(laid: &PageLayout, style: RevealStyle) -> Vec<Option<SpoilerOverlay>> {
    laid.blocks
        .iter()
        .enumerate()
        .map(|(i, block)| {
            if !block.has_spoiler() {
                return None;
            }
            let regions = measure_regions(block, block.kind);
            let seed = BASE_SEED.wrapping_add(i as u32 * 101);
            Some(SpoilerOverlay::new(seed, block.kind, regions, style))
        })
        .collect()
}

/// Draw the laid-out page. Spoiler-flagged fragments stay invisible (text)
/// or dimmed (images) until their overlay reports the content visible.
fn render_page(buffer: &mut PixelBuffer, laid: &PageLayout, overlays: &[Option<SpoilerOverlay>]) {
    buffer.clear(16, 17, 22);

    for (block, overlay) in laid.blocks.iter().zip(overlays) {
        let visible = overlay.as_ref().map_or(true, SpoilerOverlay::content_visible);
        for fragment in &block.fragments {
            let rect = fragment.rect;
            let (r, g, b) = fragment.color;
            if !fragment.spoiler || visible {
                buffer.fill_rect(
                    rect.left as i32,
                    rect.top as i32,
                    rect.width as u32,
                    rect.height as u32,
                    r,
                    g,
                    b,
                );
            } else {
                // Hidden image placeholder: heavily dimmed under the field
                buffer.fill_rect(
                    rect.left as i32,
                    rect.top as i32,
                    rect.width as u32,
                    rect.height as u32,
                    r / 4,
                    g / 4,
                    b / 4,
                );
            }
        }
    }
}

fn main() -> Result<(), String> {
    let (width, height, vsync, style) = parse_args();

    let (mut display, texture_creator) = Display::with_options("shroud", width, height, vsync)?;
    let mut target = RenderTarget::with_size(&texture_creator, width, height)?;
    let mut buffer = PixelBuffer::with_size(width, height);

    let page = Page::load(PAGE_FILE).unwrap_or_else(|_| Page::demo());
    let mut laid = layout(&page, width);
    let mut overlays = build_overlays(&laid, style);

    let mut fps_counter = FpsCounter::new(60);
    let mut show_fps = false;
    let mut frame_index: u64 = 0;
    let mut present_failures: u32 = 0;
    let clock = Instant::now();

    println!("=== shroud ===");
    println!("Resolution: {}x{}", width, height);
    if vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Click      - Reveal a spoiler");
    println!("  R          - Re-hide all spoilers");
    println!("  F          - Toggle FPS logging");
    println!("  Escape     - Quit");

    'main: loop {
        let (_dt, avg_fps) = fps_counter.tick();
        let now_ms = clock.elapsed().as_millis() as u64;

        for event in display.poll_events() {
            match event {
                InputEvent::Quit => break 'main,
                InputEvent::KeyDown(Keycode::Escape) => break 'main,
                InputEvent::KeyDown(Keycode::R) => {
                    overlays = build_overlays(&laid, style);
                },
                InputEvent::KeyDown(Keycode::F) => {
                    show_fps = !show_fps;
                },
                InputEvent::KeyDown(_) => {},
                InputEvent::Click { x, y } => {
                    for overlay in overlays.iter_mut().flatten() {
                        if overlay.handle_click(x as f32, y as f32, now_ms) {
                            break;
                        }
                    }
                },
                InputEvent::Resize { width, height } => {
                    // Resize mid-animation is fine: buffers track the new
                    // dimensions, overlays remeasure off the reflowed page
                    buffer.resize(width, height);
                    if let Err(e) = target.resize(&texture_creator, width, height) {
                        eprintln!("Failed to resize render target: {}", e);
                    }
                    laid = layout(&page, width);
                    for (block, overlay) in laid.blocks.iter().zip(overlays.iter_mut()) {
                        if let Some(overlay) = overlay {
                            overlay.remeasure(block);
                        }
                    }
                },
            }
        }

        render_page(&mut buffer, &laid, &overlays);
        for overlay in overlays.iter_mut().flatten() {
            overlay.frame(&mut buffer, now_ms);
        }

        match display.present(&mut target, &buffer) {
            Ok(()) => present_failures = 0,
            Err(e) => {
                present_failures += 1;
                eprintln!("Present failed ({}): {}", present_failures, e);
                if present_failures == MAX_PRESENT_FAILURES {
                    // Fail open: never leave content stuck behind a cover
                    // the display can no longer animate
                    for overlay in overlays.iter_mut().flatten() {
                        overlay.force_reveal();
                    }
                }
            },
        }

        frame_index += 1;
        if show_fps && frame_index % 60 == 0 {
            println!(
                "FPS {:.1} avg  {:.2}ms/frame",
                avg_fps,
                fps_counter.avg_frame_time_ms()
            );
        }
    }

    Ok(())
}
