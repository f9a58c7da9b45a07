/*
 * @Description  : 训练后保存为文本、重新加载，继续推理与训练的结果与原网络一致
 */
use only_cg::nn::{Graph, GraphError, Network, TrainingConfig, Window};
use only_cg::tensor::Tensor;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Leaf2(4×4) -> Convolution2d(2 通道) -> ReLU -> MaxPooling2d -> Affine -> Sigmoid -> MSE
fn build_network(rng: &mut StdRng) -> Result<Network, GraphError> {
    let mut graph = Graph::with_name("tiny_cnn");
    let image = graph.new_leaf2(4, 4)?;
    let shifted = graph.new_leaf2(4, 4)?;
    let target = graph.new_leaf1(1)?;

    let kernels = [
        Tensor::new_random_with_rng(-0.5, 0.5, &[3, 3], rng),
        Tensor::new_random_with_rng(-0.5, 0.5, &[3, 3], rng),
    ];
    let conv = graph.new_conv2d(&[image, shifted], &kernels, 0.05, Window::with_output(3, 3, 1, (4, 4)))?;
    let relu = graph.new_relu(conv)?;
    let pool = graph.new_max_pool2d(relu, Window::with_stride(2, 2, 2))?;
    let weight = Tensor::new_random_with_rng(-0.5, 0.5, &[5, 1], rng);
    let logit = graph.new_affine(pool, weight)?;
    let output = graph.new_sigmoid(logit)?;
    let loss = graph.new_mse(output, target)?;
    Network::new(graph, image, target, output, loss)
}

#[test]
fn test_save_load_continue_training() -> Result<(), GraphError> {
    let mut rng = StdRng::seed_from_u64(7);
    let mut network = build_network(&mut rng)?;

    let inputs: Vec<Vec<f64>> = (0..4)
        .map(|_| Tensor::new_random_with_rng(0.0, 1.0, &[16], &mut rng).to_vec())
        .collect();
    let targets: Vec<Vec<f64>> = (0..4).map(|i| vec![f64::from(i % 2)]).collect();
    let config = TrainingConfig::new().epochs(5).learning_rate(0.5).verbose(false);
    network.fit(&inputs, &targets, &config)?;

    let path = std::env::temp_dir().join(format!("only_cg_tiny_cnn_{}.cg", std::process::id()));
    network.save_text(&path)?;
    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("Node Convolution2d\nchannel 2\n"));

    // 编码顺序：image(1), shifted(2), Conv(3), ReLU(4), Pool(5), Affine(6), Sigmoid(7), target(8), MSE(9)
    let mut loaded = Network::load_text(&path, 1, 8, 7)?;
    std::fs::remove_file(&path)?;
    assert_eq!(loaded.graph().nodes_count(), network.graph().nodes_count());

    for input in &inputs {
        assert_eq!(network.expect(input)?, loaded.expect(input)?);
    }

    // 第二个通道的源节点在两张图中都保持为0，因此继续训练的结果也一致
    let before = network.fit(&inputs, &targets, &config)?;
    let after = loaded.fit(&inputs, &targets, &config)?;
    assert_eq!(before, after);
    Ok(())
}
