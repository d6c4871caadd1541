//! GLSL sources for the fullscreen pattern.

/// Vertex input carrying clip-space quad corners.
pub const POSITION_ATTRIBUTE: &str = "a_position";
/// Drawing surface size in pixels.
pub const RESOLUTION_UNIFORM: &str = "u_resolution";
/// Seconds since the renderer started.
pub const TIME_UNIFORM: &str = "u_time";

/// Pass-through vertex stage covering the canvas.
pub const VERTEX_SHADER: &str = r#"#version 300 es
precision mediump float;

in vec2 a_position;

void main() {
    gl_Position = vec4(a_position, 0.0, 1.0);
}
"#;

/// Six-step march through a rotating distance field, shading each pixel by
/// how the field changes along its view ray.
pub const FRAGMENT_SHADER: &str = r#"#version 300 es
precision mediump float;

uniform vec2 u_resolution;
uniform float u_time;

out vec4 outColor;

mat2 m(float a) {
    float c = cos(a), s = sin(a);
    return mat2(c, -s, s, c);
}

float map(vec3 p) {
    p.xz *= m(u_time * 0.4);
    p.xy *= m(u_time * 0.1);
    vec3 q = p * 65.0 + u_time;
    return length(p + vec3(sin(u_time * 0.7))) * log(length(p) + 1.0)
        + sin(q.x + sin(q.z + sin(q.y))) * 0.5 - 1.0;
}

void main() {
    vec2 a = gl_FragCoord.xy / u_resolution.y - vec2(0.9, 0.5);
    vec3 cl = vec3(0.0);
    float d = 2.5;

    for (int i = 0; i <= 5; i++) {
        vec3 p = vec3(0.0, 0.0, 4.0) + normalize(vec3(a, -1.0)) * d;
        float rz = map(p);
        float f = clamp((rz - map(p + 0.1)) * 0.5, -0.1, 1.0);
        vec3 l = vec3(0.1, 0.3, 0.4) + vec3(5.0, 2.5, 3.0) * f;
        cl = cl * l + smoothstep(2.5, 0.0, rz) * 0.6 * l;
        d += min(rz, 1.0);
    }

    outColor = vec4(cl, 1.0);
}
"#;
