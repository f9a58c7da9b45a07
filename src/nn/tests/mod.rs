mod describe;
mod graph_basic;
mod node_affine;
mod node_concatenation;
mod node_max_pool2d;
mod node_mse;
mod node_relu;
mod node_sigmoid;
mod window;
