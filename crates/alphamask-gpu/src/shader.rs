/// Alpha-mask shader.
///
/// The vertex shader emits one oversized triangle that covers clip space (no
/// vertex buffer needed). The fragment shader rebuilds a bottom-left-origin
/// `frag_coord` from `@builtin(position)`, normalizes it by the target
/// resolution, samples the source texture and writes opaque red where the
/// sampled alpha is positive, opaque blue everywhere else.
pub const MASK_WGSL: &str = r#"
struct Uniforms {
    resolution: vec2<f32>,
    _pad:       vec2<f32>,
};

@group(0) @binding(0) var<uniform> uniforms: Uniforms;
@group(0) @binding(1) var t_source: texture_2d<f32>;
@group(0) @binding(2) var s_source: sampler;

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> @builtin(position) vec4<f32> {
    let x = f32((vi << 1u) & 2u);
    let y = f32(vi & 2u);
    return vec4<f32>(x * 2.0 - 1.0, y * 2.0 - 1.0, 0.0, 1.0);
}

@fragment
fn fs_main(@builtin(position) pos: vec4<f32>) -> @location(0) vec4<f32> {
    // position has a top-left origin
    let frag_coord = vec2<f32>(pos.x, uniforms.resolution.y - pos.y);
    let uv = frag_coord / uniforms.resolution;
    let color = textureSample(t_source, s_source, uv);
    if (color.a > 0.0) {
        return vec4<f32>(1.0, 0.0, 0.0, 1.0);
    }
    return vec4<f32>(0.0, 0.0, 1.0, 1.0);
}
"#;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Per-frame data uploaded as a single uniform buffer.
/// Must match the `Uniforms` struct in [`MASK_WGSL`].
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Uniforms {
    pub resolution: [f32; 2],
    pub _pad: [f32; 2], // keep 16-byte size
}

impl Uniforms {
    pub fn new(resolution: alphamask_core::Resolution) -> Self {
        Self {
            resolution: resolution.as_vec2().to_array(),
            _pad: [0.0; 2],
        }
    }
}
