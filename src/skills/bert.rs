use std::sync::mpsc::{self, SyncSender};

use anyhow::Context;
use rust_bert::pipelines::pos_tagging::{POSModel, POSTag};

use super::{PartOfSpeech, PosTagger, TaggedToken};


/// BERT only sees 512 word pieces at a time, so long descriptions are tagged in windows of this many words.
const WORDS_PER_WINDOW: usize = 200;


type TagRequest = (Vec<String>, SyncSender<Vec<Vec<POSTag>>>);


/// Part of speech tagger backed by a rust-bert model.
///
/// The model lives on its own thread, since it cannot be moved between threads, and requests are sent to it
/// over a channel.
pub(super) struct BertTagger {
    sender: mpsc::Sender<TagRequest>
}


impl BertTagger {
    /// Starts the model thread and waits until the model is loaded (downloading it on first use).
    pub(super) fn spawn() -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel::<TagRequest>();
        let (ready_sender, ready_receiver) = mpsc::sync_channel(1);

        std::thread::Builder::new()
            .name("pos-tagger".to_string())
            .spawn(move || {
                let model = match POSModel::new(Default::default()) {
                    Ok(model) => {
                        let _ = ready_sender.send(Ok(()));
                        model
                    }
                    Err(e) => {
                        let _ = ready_sender.send(Err(anyhow::anyhow!("Failed to load the POS model: {e}")));
                        return;
                    }
                };
                while let Ok((windows, reply)) = receiver.recv() {
                    let _ = reply.send(model.predict(&windows));
                }
            })
            .context("Failed to spawn the tagger thread")?;

        ready_receiver
            .recv()
            .context("Tagger thread exited before loading the model")??;
        Ok(Self { sender })
    }
}


impl PosTagger for BertTagger {
    fn tag(&self, text: &str) -> anyhow::Result<Vec<TaggedToken>> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let windows = words
            .chunks(WORDS_PER_WINDOW)
            .map(|window| window.join(" "))
            .collect();

        let (reply_sender, reply_receiver) = mpsc::sync_channel(1);
        self.sender
            .send((windows, reply_sender))
            .map_err(|_| anyhow::anyhow!("Tagger thread has stopped"))?;
        let tagged = reply_receiver.recv().context("Tagger thread dropped the request")?;

        Ok(tagged
            .into_iter()
            .flatten()
            .map(|tag| TaggedToken { pos: PartOfSpeech::from_label(&tag.label), text: tag.word })
            .collect())
    }
}
