use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::sync::Arc;

use depchart::{GrammarConfig, Parser, Sentence, TableGrammar, TableLexicon, Vocabulary};

const WORDS: [&str; 4] = ["the", "dog", "saw", "cats"];

fn build_parser() -> Parser<TableGrammar, TableLexicon> {
    let lexicon_csv = "\
the,DT,-0.1
dog,NN,-0.4
dog,VB,-2.0
saw,VBD,-0.5
saw,NN,-1.8
cats,NNS,-0.3
";
    let grammar_csv = "\
arg,.$$.,VBD,L,*,-0.2
arg,.$$.,VB,L,*,-1.0
arg,VBD,NN,L,*,-0.6
arg,VBD,NNS,R,*,-0.7
arg,VBD,NNS,L,*,-1.5
arg,VB,NNS,R,*,-0.9
arg,NN,DT,L,*,-0.2
arg,NNS,DT,L,*,-0.4
arg,NN,NN,L,*,-2.5
arg,NNS,NN,L,*,-1.9
stop,VBD,L,0,-1.0
stop,NN,L,0,-0.8
stop,NNS,L,0,-0.5
";
    let mut vocab = Vocabulary::new();
    let lexicon = TableLexicon::from_reader(lexicon_csv.as_bytes(), &mut vocab).unwrap();
    let vocab = Arc::new(vocab);
    let grammar =
        TableGrammar::from_reader(grammar_csv.as_bytes(), vocab.clone(), GrammarConfig::default())
            .unwrap();
    Parser::new(vocab, grammar, lexicon).unwrap()
}

fn sentence(len: usize) -> Sentence {
    Sentence::from_words((0..len).map(|i| WORDS[i % WORDS.len()]))
}

fn bench_parse(c: &mut Criterion) {
    let parser = build_parser();
    let mut group = c.benchmark_group("Parse");
    group.sample_size(10);

    for len in [4, 8, 16, 24] {
        let sent = sentence(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::new("inside", len), &sent, |b, sent| {
            let mut worker = parser.new_worker();
            b.iter(|| {
                worker.parse(sent).unwrap();
                std::hint::black_box(worker.best_score());
            })
        });

        let outside = parser.clone().compute_outside(true);
        group.bench_with_input(BenchmarkId::new("inside_outside", len), &sent, |b, sent| {
            let mut worker = outside.new_worker();
            b.iter(|| {
                worker.parse(sent).unwrap();
                std::hint::black_box(worker.best_parse().unwrap());
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
