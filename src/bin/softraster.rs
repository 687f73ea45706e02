// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! softraster command line renderer
//!
//! Renders one of the built-in demo scenes into a PNG file. The renderer
//! settings come from a TOML file (`--config` or `SOFTRASTER_CONFIG`), and a
//! `.env` file in the working directory is honored for both that variable and
//! `RUST_LOG`.

use clap::{Parser, ValueEnum};
use image::{Rgba, RgbaImage};
use softraster::core::config::{Hint, RendererConfig};
use softraster::core::raster::{Texture, TextureFormat};
use softraster::core::renderer::{EndMode, Renderer, ShapeKind};
use std::f32::consts::PI;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Environment variable naming the default config file
const CONFIG_ENV: &str = "SOFTRASTER_CONFIG";

#[derive(Parser)]
#[command(name = "softraster")]
#[command(about = "Render a demo scene with the softraster CPU rasterizer")]
struct Cli {
    /// Scene to render
    #[arg(long, value_enum, default_value_t = Scene::Triangles)]
    scene: Scene,

    /// Renderer config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output PNG
    #[arg(long, default_value = "softraster.png")]
    output: PathBuf,

    /// Texture image for the textured scene (a checkerboard when omitted)
    #[arg(long)]
    texture: Option<PathBuf>,

    /// Write frame statistics as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Rotation of the 3D scenes in degrees
    #[arg(long, default_value_t = 30.0)]
    angle: f32,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scene {
    /// Gouraud triangles, thick strokes and points
    Triangles,
    /// Six-sided cube under default and point lights
    LitCube,
    /// Concave polygons through the triangulator
    Polygon,
    /// Perspective textured quad
    Textured,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env must be read before the logger looks at RUST_LOG
    dotenvy::dotenv().ok();

    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    let config = match &config_path {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            RendererConfig::load(path)?
        }
        None => RendererConfig::default(),
    };

    if cli.dump_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    log::info!(
        "Rendering {:?} at {}x{}",
        cli.scene,
        config.width,
        config.height
    );

    let mut renderer = Renderer::new(config)?;
    renderer.begin_frame();
    renderer.background(renderer.config().background);

    let angle = cli.angle.to_radians();
    match cli.scene {
        Scene::Triangles => draw_triangles(&mut renderer)?,
        Scene::LitCube => draw_lit_cube(&mut renderer, angle)?,
        Scene::Polygon => draw_polygons(&mut renderer)?,
        Scene::Textured => {
            let texture = match &cli.texture {
                Some(path) => load_texture(path)?,
                None => checkerboard(64, 8)?,
            };
            draw_textured(&mut renderer, Rc::new(texture), angle)?;
        }
    }
    renderer.end_frame();

    let stats = renderer.stats();
    log::info!(
        "Drew {} triangles, {} lines, {} points",
        stats.triangles,
        stats.lines,
        stats.points
    );

    save_png(&renderer, &cli.output)?;
    log::info!("Wrote {}", cli.output.display());

    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_string_pretty(&stats)?)?;
        log::info!("Wrote report {}", path.display());
    }

    Ok(())
}

fn draw_triangles(r: &mut Renderer) -> softraster::Result<()> {
    let (w, h) = (r.width() as f32, r.height() as f32);

    r.no_stroke();
    r.begin_shape(ShapeKind::Triangles)?;
    r.fill(1.0, 0.0, 0.0, 1.0);
    r.vertex(w * 0.1, h * 0.1, 0.0)?;
    r.fill(0.0, 1.0, 0.0, 1.0);
    r.vertex(w * 0.6, h * 0.15, 0.0)?;
    r.fill(0.0, 0.0, 1.0, 1.0);
    r.vertex(w * 0.3, h * 0.7, 0.0)?;
    r.end_shape(EndMode::Open)?;

    // translucent strip over the first triangle
    r.fill(1.0, 0.8, 0.0, 0.5);
    r.stroke(0.1, 0.1, 0.1, 1.0);
    r.begin_shape(ShapeKind::TriangleStrip)?;
    for i in 0..6 {
        let x = w * (0.2 + 0.12 * i as f32);
        let y = if i % 2 == 0 { h * 0.35 } else { h * 0.55 };
        r.vertex(x, y, 0.0)?;
    }
    r.end_shape(EndMode::Open)?;

    for (i, weight) in [1.0, 2.0, 4.0, 8.0].into_iter().enumerate() {
        let y = h * (0.75 + 0.05 * i as f32);
        r.stroke_weight(weight);
        r.stroke(0.2 * i as f32, 0.2, 0.6, 1.0);
        r.begin_shape(ShapeKind::Lines)?;
        r.vertex(w * 0.1, y, 0.0)?;
        r.vertex(w * 0.9, y - h * 0.05, 0.0)?;
        r.end_shape(EndMode::Open)?;
    }

    r.stroke_weight(1.0);
    r.stroke(0.0, 0.0, 0.0, 1.0);
    r.begin_shape(ShapeKind::Points)?;
    for i in 0..20 {
        r.vertex(w * (0.05 + 0.045 * i as f32), h * 0.05, 0.0)?;
    }
    r.end_shape(EndMode::Open)
}

fn draw_lit_cube(r: &mut Renderer, angle: f32) -> softraster::Result<()> {
    let (w, h) = (r.width() as f32, r.height() as f32);
    let s = w.min(h) / 4.0;

    r.lights()?;
    r.point_light([0.4, 0.3, 0.2], [w, 0.0, s * 4.0])?;
    r.stroke(0.0, 0.0, 0.0, 1.0);

    r.push_matrix()?;
    r.translate(w / 2.0, h / 2.0, 0.0);
    r.rotate_y(angle);
    r.rotate_x(angle * 0.7);

    // normal, color and the four corners of each face
    let faces: [([f32; 3], [f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [0.9, 0.2, 0.2], [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]]),
        ([0.0, 0.0, -1.0], [0.2, 0.9, 0.2], [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]]),
        ([1.0, 0.0, 0.0], [0.2, 0.2, 0.9], [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]]),
        ([-1.0, 0.0, 0.0], [0.9, 0.9, 0.2], [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]]),
        ([0.0, -1.0, 0.0], [0.2, 0.9, 0.9], [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]]),
        ([0.0, 1.0, 0.0], [0.9, 0.2, 0.9], [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]]),
    ];
    for (normal, color, corners) in faces {
        r.fill(color[0], color[1], color[2], 1.0);
        r.begin_shape(ShapeKind::Quads)?;
        r.normal(normal[0], normal[1], normal[2]);
        for [x, y, z] in corners {
            r.vertex(x * s, y * s, z * s)?;
        }
        r.end_shape(EndMode::Close)?;
    }

    r.pop_matrix()
}

fn draw_polygons(r: &mut Renderer) -> softraster::Result<()> {
    let (w, h) = (r.width() as f32, r.height() as f32);

    // ten-pointed star
    let (cx, cy) = (w * 0.3, h * 0.5);
    let outer = w.min(h) * 0.25;
    r.fill(1.0, 0.85, 0.1, 1.0);
    r.stroke(0.4, 0.2, 0.0, 1.0);
    r.stroke_weight(2.0);
    r.begin_shape(ShapeKind::Polygon)?;
    for i in 0..20 {
        let radius = if i % 2 == 0 { outer } else { outer * 0.45 };
        let a = i as f32 * PI / 10.0 - PI / 2.0;
        r.vertex(cx + radius * a.cos(), cy + radius * a.sin(), 0.0)?;
    }
    r.end_shape(EndMode::Close)?;

    // arrow
    let (ox, oy, u) = (w * 0.6, h * 0.3, w.min(h) * 0.08);
    let arrow = [(0.0, 1.0), (2.0, 1.0), (2.0, 0.0), (4.0, 2.0), (2.0, 4.0), (2.0, 3.0), (0.0, 3.0)];
    r.fill(0.2, 0.5, 0.9, 1.0);
    r.stroke_weight(1.0);
    r.stroke(0.0, 0.0, 0.0, 1.0);
    r.begin_shape(ShapeKind::Polygon)?;
    for (x, y) in arrow {
        r.vertex(ox + x * u, oy + y * u, 0.0)?;
    }
    r.end_shape(EndMode::Close)
}

fn draw_textured(r: &mut Renderer, texture: Rc<Texture>, angle: f32) -> softraster::Result<()> {
    let (w, h) = (r.width() as f32, r.height() as f32);
    let s = w.min(h) * 0.35;

    r.hint(Hint::EnableAccurateTextures);
    r.no_stroke();
    r.push_matrix()?;
    r.translate(w / 2.0, h / 2.0, 0.0);
    r.rotate_x(angle);

    r.begin_shape(ShapeKind::Quads)?;
    r.texture(texture);
    r.vertex_uv(-s, -s, 0.0, 0.0, 0.0)?;
    r.vertex_uv(s, -s, 0.0, 1.0, 0.0)?;
    r.vertex_uv(s, s, 0.0, 1.0, 1.0)?;
    r.vertex_uv(-s, s, 0.0, 0.0, 1.0)?;
    r.end_shape(EndMode::Close)?;

    r.pop_matrix()
}

/// Load a PNG (or any format `image` knows) as an ARGB texture
fn load_texture(path: &Path) -> Result<Texture, Box<dyn std::error::Error>> {
    let img = image::open(path)?.to_rgba8();
    let (width, height) = img.dimensions();
    let pixels = img
        .pixels()
        .map(|Rgba([r, g, b, a])| u32::from_be_bytes([*a, *r, *g, *b]))
        .collect();
    log::info!("Loaded texture {} ({}x{})", path.display(), width, height);
    Ok(Texture::new(
        TextureFormat::Argb,
        width as usize,
        height as usize,
        pixels,
    )?)
}

fn checkerboard(size: usize, cell: usize) -> softraster::Result<Texture> {
    let pixels = (0..size * size)
        .map(|i| {
            let (x, y) = (i % size, i / size);
            if (x / cell + y / cell) % 2 == 0 {
                0xFFFF_FFFF
            } else {
                0xFF20_4080
            }
        })
        .collect();
    Texture::new(TextureFormat::Rgb, size, size, pixels)
}

fn save_png(r: &Renderer, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let width = r.width();
    let pixels = r.pixels();
    let img = RgbaImage::from_fn(width as u32, r.height() as u32, |x, y| {
        // the alpha byte holds coverage, not transparency
        let [_, red, green, blue] = pixels[y as usize * width + x as usize].to_be_bytes();
        Rgba([red, green, blue, 0xFF])
    });
    img.save(path)?;
    Ok(())
}
