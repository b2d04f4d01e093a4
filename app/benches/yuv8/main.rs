/*
 * Copyright (c) Radzivon Bartoshyk, 11/2024. All rights reserved.
 *
 * Redistribution and use in source and binary forms, with or without modification,
 * are permitted provided that the following conditions are met:
 *
 * 1.  Redistributions of source code must retain the above copyright notice, this
 * list of conditions and the following disclaimer.
 *
 * 2.  Redistributions in binary form must reproduce the above copyright notice,
 * this list of conditions and the following disclaimer in the documentation
 * and/or other materials provided with the distribution.
 *
 * 3.  Neither the name of the copyright holder nor the names of its
 * contributors may be used to endorse or promote products derived from
 * this software without specific prior written permission.
 *
 * THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS "AS IS"
 * AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
 * IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE ARE
 * DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT HOLDER OR CONTRIBUTORS BE LIABLE
 * FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
 * DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR
 * SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER
 * CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY,
 * OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
 * OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.
 */
use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;
use yuv2rgb::{
    available_paths, conversion_handler, rgb24_to_yuv420, yuv420_to_nv12, yuv420_to_nv21,
    BufferStoreMut, ConversionHandler, ConversionKind, YuvBiPlanarImageMut, YuvPlanarImage,
    YuvPlanarImageMut, YuvStandard,
};

// Every tight stride of this size is a multiple of 16, so one layout serves all paths
const WIDTH: u32 = 1920;
const HEIGHT: u32 = 1080;

struct AlignedBuffer {
    storage: Vec<u8>,
    offset: usize,
    len: usize,
}

impl AlignedBuffer {
    fn new(len: usize) -> AlignedBuffer {
        let storage = vec![0u8; len + 16];
        let offset = storage.as_ptr().align_offset(16);
        AlignedBuffer {
            storage,
            offset,
            len,
        }
    }

    fn from_slice(src: &[u8]) -> AlignedBuffer {
        let mut buffer = AlignedBuffer::new(src.len());
        buffer.as_mut_slice().copy_from_slice(src);
        buffer
    }

    fn as_slice(&self) -> &[u8] {
        &self.storage[self.offset..self.offset + self.len]
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.storage[self.offset..self.offset + self.len]
    }
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = rand::rng();
    let width = WIDTH as usize;
    let height = HEIGHT as usize;
    let chroma_width = width / 2;
    let chroma_height = height / 2;
    let standard = YuvStandard::Bt601;

    let rgb_src: Vec<u8> = (0..width * height * 3).map(|_| rng.random()).collect();
    let rgba_src: Vec<u8> = (0..width * height * 4).map(|_| rng.random()).collect();
    let rgb_src = AlignedBuffer::from_slice(&rgb_src);
    let rgba_src = AlignedBuffer::from_slice(&rgba_src);

    let mut planar = YuvPlanarImageMut::alloc(WIDTH, HEIGHT);
    rgb24_to_yuv420(&mut planar, rgb_src.as_slice(), WIDTH * 3, standard).unwrap();
    let y_plane = AlignedBuffer::from_slice(planar.y_plane.borrow());
    let u_plane = AlignedBuffer::from_slice(planar.u_plane.borrow());
    let v_plane = AlignedBuffer::from_slice(planar.v_plane.borrow());
    let fixed_planar = YuvPlanarImage {
        y_plane: y_plane.as_slice(),
        y_stride: WIDTH,
        u_plane: u_plane.as_slice(),
        u_stride: chroma_width as u32,
        v_plane: v_plane.as_slice(),
        v_stride: chroma_width as u32,
        width: WIDTH,
        height: HEIGHT,
    };

    let mut nv12_y = AlignedBuffer::new(width * height);
    let mut nv12_uv = AlignedBuffer::new(chroma_width * 2 * chroma_height);
    let mut nv12 = YuvBiPlanarImageMut {
        y_plane: BufferStoreMut::Borrowed(nv12_y.as_mut_slice()),
        y_stride: WIDTH,
        uv_plane: BufferStoreMut::Borrowed(nv12_uv.as_mut_slice()),
        uv_stride: WIDTH,
        width: WIDTH,
        height: HEIGHT,
    };
    yuv420_to_nv12(&fixed_planar, &mut nv12).unwrap();

    let mut nv21_y = AlignedBuffer::new(width * height);
    let mut nv21_uv = AlignedBuffer::new(chroma_width * 2 * chroma_height);
    let mut nv21 = YuvBiPlanarImageMut {
        y_plane: BufferStoreMut::Borrowed(nv21_y.as_mut_slice()),
        y_stride: WIDTH,
        uv_plane: BufferStoreMut::Borrowed(nv21_uv.as_mut_slice()),
        uv_stride: WIDTH,
        width: WIDTH,
        height: HEIGHT,
    };
    yuv420_to_nv21(&fixed_planar, &mut nv21).unwrap();

    let fixed_nv12 = nv12.to_fixed();
    let fixed_nv21 = nv21.to_fixed();

    for kind in ConversionKind::ALL {
        for path in available_paths() {
            let name = format!("{} {}", kind, path);
            match conversion_handler(kind, path) {
                ConversionHandler::PlanarDecode(convert) => {
                    c.bench_function(&name, |b| {
                        let mut rgb = AlignedBuffer::new(width * height * 3);
                        b.iter(|| {
                            convert(&fixed_planar, rgb.as_mut_slice(), WIDTH * 3, standard)
                                .unwrap();
                        })
                    });
                }
                ConversionHandler::BiPlanarDecode(convert) => {
                    let source = if kind == ConversionKind::Nv21ToRgb24 {
                        &fixed_nv21
                    } else {
                        &fixed_nv12
                    };
                    c.bench_function(&name, |b| {
                        let mut rgb = AlignedBuffer::new(width * height * 3);
                        b.iter(|| {
                            convert(source, rgb.as_mut_slice(), WIDTH * 3, standard).unwrap();
                        })
                    });
                }
                ConversionHandler::Encode(convert) => {
                    let (source, stride) = if kind == ConversionKind::Rgba32ToYuv420 {
                        (&rgba_src, WIDTH * 4)
                    } else {
                        (&rgb_src, WIDTH * 3)
                    };
                    c.bench_function(&name, |b| {
                        let mut y = AlignedBuffer::new(width * height);
                        let mut u = AlignedBuffer::new(chroma_width * chroma_height);
                        let mut v = AlignedBuffer::new(chroma_width * chroma_height);
                        let mut target = YuvPlanarImageMut {
                            y_plane: BufferStoreMut::Borrowed(y.as_mut_slice()),
                            y_stride: WIDTH,
                            u_plane: BufferStoreMut::Borrowed(u.as_mut_slice()),
                            u_stride: chroma_width as u32,
                            v_plane: BufferStoreMut::Borrowed(v.as_mut_slice()),
                            v_stride: chroma_width as u32,
                            width: WIDTH,
                            height: HEIGHT,
                        };
                        b.iter(|| {
                            convert(&mut target, source.as_slice(), stride, standard).unwrap();
                        })
                    });
                }
            }
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
