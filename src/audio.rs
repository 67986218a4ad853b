use crate::constants::{AUDIO_FFT_SIZE, AUDIO_FFT_SMOOTHING};
use crate::core::{AudioCommand, SharedInstance, SketchError};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

/// WebAudio backend executing the audio card's commands.
///
/// Graph: buffer source -> analyser -> output gain -> destination. Pausing
/// stops the source and remembers the offset; playing starts a fresh source
/// from that offset.
pub struct WebAudioPlayer {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    buffer: RefCell<Option<web::AudioBuffer>>,
    source: RefCell<Option<web::AudioBufferSourceNode>>,
    ended: RefCell<Option<Closure<dyn FnMut()>>>,
    started_at: Cell<f64>,
    offset: Cell<f64>,
    scratch: RefCell<Vec<f32>>,
}

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

impl WebAudioPlayer {
    pub fn new() -> anyhow::Result<Rc<Self>> {
        let ctx = web::AudioContext::new().map_err(js_err)?;
        let analyser = web::AnalyserNode::new(&ctx).map_err(js_err)?;
        analyser.set_fft_size(AUDIO_FFT_SIZE);
        analyser.set_smoothing_time_constant(AUDIO_FFT_SMOOTHING);
        let output = web::GainNode::new(&ctx).map_err(js_err)?;
        output.gain().set_value(1.0);
        analyser.connect_with_audio_node(&output).map_err(js_err)?;
        output
            .connect_with_audio_node(&ctx.destination())
            .map_err(js_err)?;
        let bins = analyser.fft_size() as usize;
        Ok(Rc::new(Self {
            ctx,
            analyser,
            buffer: RefCell::new(None),
            source: RefCell::new(None),
            ended: RefCell::new(None),
            started_at: Cell::new(0.0),
            offset: Cell::new(0.0),
            scratch: RefCell::new(vec![0.0; bins]),
        }))
    }

    pub fn is_playing(&self) -> bool {
        self.source.borrow().is_some()
    }

    /// Drain the sketch's outbox and run each command. Must be called without
    /// an outstanding borrow of `instance`.
    pub fn execute(self: &Rc<Self>, instance: &SharedInstance) {
        loop {
            let commands = {
                let mut inst = instance.borrow_mut();
                match inst.sketch_mut().as_audio_mut() {
                    Some(audio) => audio.take_commands(),
                    None => return,
                }
            };
            if commands.is_empty() {
                return;
            }
            for cmd in commands {
                self.run(cmd, instance);
            }
        }
    }

    fn run(self: &Rc<Self>, cmd: AudioCommand, instance: &SharedInstance) {
        log::debug!("[audio] {:?}", cmd);
        match cmd {
            AudioCommand::Unlock => self.unlock(instance),
            AudioCommand::Load { url } => self.load(url, instance),
            AudioCommand::Play => self.play(instance),
            AudioCommand::Pause => self.pause(),
        }
    }

    // resume() has to be called inside the gesture callback; only the
    // settlement is awaited.
    fn unlock(&self, instance: &SharedInstance) {
        let deliver = |instance: &SharedInstance, result: Result<(), SketchError>| {
            if let Some(audio) = instance.borrow_mut().sketch_mut().as_audio_mut() {
                audio.on_unlock_result(result);
            }
        };
        match self.ctx.resume() {
            Ok(promise) => {
                let instance = instance.clone();
                spawn_local(async move {
                    let result = JsFuture::from(promise)
                        .await
                        .map(|_| ())
                        .map_err(|e| SketchError::AudioUnlock(format!("{:?}", e)));
                    deliver(&instance, result);
                });
            }
            Err(e) => deliver(instance, Err(SketchError::AudioUnlock(format!("{:?}", e)))),
        }
    }

    fn load(self: &Rc<Self>, url: String, instance: &SharedInstance) {
        let player = self.clone();
        let instance = instance.clone();
        spawn_local(async move {
            let result = match player.fetch_and_decode(&url).await {
                Ok(buffer) => {
                    log::info!("[audio] loaded {} ({:.1}s)", url, buffer.duration());
                    *player.buffer.borrow_mut() = Some(buffer);
                    player.offset.set(0.0);
                    Ok(())
                }
                Err(e) => Err(SketchError::AudioLoad {
                    url: url.clone(),
                    reason: e.to_string(),
                }),
            };
            if let Some(audio) = instance.borrow_mut().sketch_mut().as_audio_mut() {
                audio.on_load_result(result);
            }
            // a successful load may have queued Play
            player.execute(&instance);
        });
    }

    async fn fetch_and_decode(&self, url: &str) -> anyhow::Result<web::AudioBuffer> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let response: web::Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        if !response.ok() {
            anyhow::bail!("HTTP {}", response.status());
        }
        let bytes: js_sys::ArrayBuffer = JsFuture::from(response.array_buffer().map_err(js_err)?)
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;
        let decoded = JsFuture::from(self.ctx.decode_audio_data(&bytes).map_err(js_err)?)
            .await
            .map_err(js_err)?;
        decoded.dyn_into::<web::AudioBuffer>().map_err(js_err)
    }

    fn play(self: &Rc<Self>, instance: &SharedInstance) {
        if self.is_playing() {
            return;
        }
        let Some(buffer) = self.buffer.borrow().clone() else {
            log::warn!("[audio] play requested before load");
            return;
        };
        let source = match self.ctx.create_buffer_source() {
            Ok(s) => s,
            Err(e) => {
                log::error!("[audio] AudioBufferSourceNode error: {:?}", e);
                return;
            }
        };
        source.set_buffer(Some(&buffer));
        if let Err(e) = source.connect_with_audio_node(&self.analyser) {
            log::error!("[audio] connect error: {:?}", e);
            return;
        }

        let weak_player: Weak<Self> = Rc::downgrade(self);
        let weak_instance = Rc::downgrade(instance);
        let on_ended = Closure::wrap(Box::new(move || {
            if let Some(player) = weak_player.upgrade() {
                player.source.borrow_mut().take();
                player.offset.set(0.0);
            }
            if let Some(instance) = weak_instance.upgrade() {
                if let Some(audio) = instance.borrow_mut().sketch_mut().as_audio_mut() {
                    audio.on_ended();
                }
            }
        }) as Box<dyn FnMut()>);
        source.set_onended(Some(on_ended.as_ref().unchecked_ref()));

        let mut offset = self.offset.get();
        if offset >= buffer.duration() {
            offset = 0.0;
        }
        if let Err(e) = source.start_with_when_and_grain_offset(0.0, offset) {
            log::error!("[audio] start error: {:?}", e);
            return;
        }
        self.started_at.set(self.ctx.current_time() - offset);
        *self.source.borrow_mut() = Some(source);
        // replacing drops the previous source's handler, which was detached
        *self.ended.borrow_mut() = Some(on_ended);
    }

    fn pause(&self) {
        let Some(source) = self.source.borrow_mut().take() else {
            return;
        };
        // stop() fires onended too; detach first so it is not taken for a natural end
        source.set_onended(None);
        if let Err(e) = source.stop() {
            log::warn!("[audio] stop error: {:?}", e);
        }
        self.offset
            .set((self.ctx.current_time() - self.started_at.get()).max(0.0));
    }

    /// Copy the analyser's current waveform into the audio sketch.
    pub fn sample_into(&self, instance: &mut crate::core::SketchInstance) {
        let Some(audio) = instance.sketch_mut().as_audio_mut() else {
            return;
        };
        if !self.is_playing() {
            return;
        }
        let mut buf = self.scratch.borrow_mut();
        self.analyser.get_float_time_domain_data(&mut buf);
        audio.update_analysis(&buf);
    }
}
